//! Activity view.

model_view! {
    /// An entry in a user's activity stream.
    Activity => Activity
}

impl Activity {
    pub fn id(&self) -> Option<&str> {
        self.0.string("id")
    }

    pub fn title(&self) -> Option<&str> {
        self.0.string("title")
    }

    pub fn body(&self) -> Option<&str> {
        self.0.string("body")
    }

    /// Message-bundle id used instead of a literal title.
    pub fn title_id(&self) -> Option<&str> {
        self.0.string("titleId")
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.0.set_string("title", title);
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.0.set_string("body", body);
    }

    pub fn set_title_id(&mut self, title_id: impl Into<String>) {
        self.0.set_string("titleId", title_id);
    }
}
