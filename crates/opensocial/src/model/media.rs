//! Album and media item views.

model_view! {
    /// A photo/video album.
    Album => Album
}

impl Album {
    pub fn id(&self) -> Option<&str> {
        self.0.string("id")
    }

    pub fn title(&self) -> Option<&str> {
        self.0.string("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.0.string("ownerId")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.set_string("id", id);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.0.set_string("title", title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.0.set_string("description", description);
    }
}

model_view! {
    /// One photo, video, or audio item inside an album.
    MediaItem => MediaItem
}

impl MediaItem {
    pub fn id(&self) -> Option<&str> {
        self.0.string("id")
    }

    pub fn album_id(&self) -> Option<&str> {
        self.0.string("album_id")
    }

    pub fn url(&self) -> Option<&str> {
        self.0.string("url")
    }

    /// Thumbnail URL; containers use either `thumbnailUrl` or `thumbnail_url`.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.0
            .string("thumbnailUrl")
            .or_else(|| self.0.string("thumbnail_url"))
    }

    /// `image`, `video`, or `audio`.
    pub fn media_type(&self) -> Option<&str> {
        self.0.string("type")
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.0.string("mime_type")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.set_string("id", id);
    }

    pub fn set_album_id(&mut self, album_id: impl Into<String>) {
        self.0.set_string("album_id", album_id);
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.0.set_string("url", url);
    }

    pub fn set_thumbnail_url(&mut self, url: impl Into<String>) {
        self.0.set_string("thumbnail_url", url);
    }

    pub fn set_media_type(&mut self, media_type: impl Into<String>) {
        self.0.set_string("type", media_type);
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.0.set_string("mime_type", mime_type);
    }
}
