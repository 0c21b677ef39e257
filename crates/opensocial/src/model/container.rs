//! Views for container-specific resources: notifications, status/mood, and
//! profile comments.

use crate::errors::ModelError;
use crate::model::{MediaItem, Model, Object};

model_view! {
    /// A notification sent to one or more users.
    Notification => Notification
}

impl Notification {
    /// Value of the `content` template parameter.
    pub fn content(&self) -> Option<&str> {
        self.template_parameter("content")
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), ModelError> {
        self.add_template_parameter("content", content)
    }

    pub fn recipients(&self) -> &[String] {
        self.0
            .field("recipientIds")
            .and_then(|f| f.string_values().ok())
            .unwrap_or_default()
    }

    pub fn add_recipient(&mut self, id: impl Into<String>) -> Result<(), ModelError> {
        let id: String = id.into();
        self.0.push_value("recipientIds", id)
    }

    pub fn media_items(&self) -> Vec<MediaItem> {
        self.0
            .field("mediaItems")
            .and_then(|f| f.values().ok())
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(MediaItem::from_object)
            .collect()
    }

    pub fn add_media_item(&mut self, item: MediaItem) -> Result<(), ModelError> {
        self.0.push_value("mediaItems", item.into_object())
    }

    /// Looks up `key` in the `templateParameters` list of `{key, value}` pairs.
    pub fn template_parameter(&self, key: &str) -> Option<&str> {
        self.0
            .field("templateParameters")?
            .values()
            .ok()?
            .iter()
            .find(|p| p.string("key") == Some(key))
            .and_then(|p| p.string("value"))
    }

    pub fn add_template_parameter(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        let mut parameter = Object::new();
        parameter.set_string("key", key);
        parameter.set_string("value", value);
        self.0.push_value("templateParameters", parameter)
    }
}

model_view! {
    /// A user's status message and mood.
    StatusMood => StatusMood
}

impl StatusMood {
    pub fn status(&self) -> Option<&str> {
        self.0.string("status")
    }

    pub fn mood_id(&self) -> Option<&str> {
        self.0.string("moodId")
    }

    pub fn mood_name(&self) -> Option<&str> {
        self.0.string("moodName")
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.0.set_string("status", status);
    }

    pub fn set_mood_id(&mut self, mood_id: u64) {
        self.0.set_string("moodId", mood_id.to_string());
    }
}

model_view! {
    /// A comment left on a user's profile.
    Comment => Comment
}

impl Comment {
    pub fn id(&self) -> Option<&str> {
        self.0.string("commentId")
    }

    pub fn body(&self) -> Option<&str> {
        self.0.string("body")
    }

    /// Id of the commenting user, read from the nested `author` object.
    pub fn author_id(&self) -> Option<&str> {
        self.0.object("author")?.string("id")
    }

    pub fn posted_date(&self) -> Option<&str> {
        self.0.string("postedDate")
    }
}
