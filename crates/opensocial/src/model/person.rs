//! Person view.

model_view! {
    /// A container user profile.
    Person => Person
}

impl Person {
    pub fn id(&self) -> Option<&str> {
        self.0.string("id")
    }

    /// Best human-readable name.
    ///
    /// Tries `displayName`, then the `name` field (`givenName familyName` when
    /// complex, the plain value when scalar), then `nickname`. Returns an
    /// empty string when none is present.
    pub fn display_name(&self) -> String {
        if let Some(display) = self.0.string("displayName") {
            return display.to_owned();
        }
        if let Some(name) = self.0.object("name") {
            let parts: Vec<&str> = ["givenName", "familyName"]
                .into_iter()
                .filter_map(|part| name.string(part))
                .collect();
            if !parts.is_empty() {
                return parts.join(" ");
            }
        } else if let Some(name) = self.0.string("name") {
            return name.to_owned();
        }
        self.0.string("nickname").unwrap_or_default().to_owned()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.0.string("thumbnailUrl")
    }
}
