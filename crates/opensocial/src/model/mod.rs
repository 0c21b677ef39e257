//! Field model and typed entity views.
//!
//! Every parsed entry is an [`Object`]: a map from field name to [`Field`].
//! Typed views ([`Person`], [`Activity`], ...) wrap an `Object` without
//! copying and expose the fields that carry domain meaning. Views never fail
//! on missing fields; accessors return `Option` or fall back to a default.

use serde::{Deserialize, Serialize};

mod field;
mod object;

pub use field::{Field, FieldValue};
pub use object::Object;

pub(crate) use object::json_kind;

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// Entity kind a [`crate::Request`] expects in its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Untyped [`Object`].
    #[default]
    Generic,
    Person,
    Activity,
    AppData,
    Album,
    MediaItem,
    Notification,
    StatusMood,
    Comment,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Generic => "generic",
            Self::Person => "person",
            Self::Activity => "activity",
            Self::AppData => "app_data",
            Self::Album => "album",
            Self::MediaItem => "media_item",
            Self::Notification => "notification",
            Self::StatusMood => "status_mood",
            Self::Comment => "comment",
        };
        f.write_str(s)
    }
}

/// A typed read/write view over an [`Object`].
pub trait Model: Sized {
    /// Kind tag recorded on requests that expect this view.
    const KIND: ModelKind;

    /// Wraps a parsed object.
    fn from_object(object: Object) -> Self;

    /// Borrows the underlying object.
    fn as_object(&self) -> &Object;

    /// Unwraps the underlying object.
    fn into_object(self) -> Object;
}

impl Model for Object {
    const KIND: ModelKind = ModelKind::Generic;

    fn from_object(object: Object) -> Self {
        object
    }

    fn as_object(&self) -> &Object {
        self
    }

    fn into_object(self) -> Object {
        self
    }
}

// ---------------------------------------------------------------------------
// Macro for Object-wrapped views.
// Generates: struct, Model impl, new(), From<Object>, as_object_mut().
// ---------------------------------------------------------------------------
macro_rules! model_view {
    (
        $(#[$attr:meta])*
        $name:ident => $kind:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(crate::model::Object);

        impl $name {
            /// Creates an empty view.
            pub fn new() -> Self {
                Self::default()
            }

            /// Mutable access to the underlying object.
            pub fn as_object_mut(&mut self) -> &mut crate::model::Object {
                &mut self.0
            }
        }

        impl crate::model::Model for $name {
            const KIND: crate::model::ModelKind = crate::model::ModelKind::$kind;

            fn from_object(object: crate::model::Object) -> Self {
                Self(object)
            }

            fn as_object(&self) -> &crate::model::Object {
                &self.0
            }

            fn into_object(self) -> crate::model::Object {
                self.0
            }
        }

        impl From<crate::model::Object> for $name {
            fn from(object: crate::model::Object) -> Self {
                Self(object)
            }
        }
    };
}

mod activity;
mod app_data;
mod container;
mod media;
mod person;

pub use activity::Activity;
pub use app_data::AppData;
pub use container::{Comment, Notification, StatusMood};
pub use media::{Album, MediaItem};
pub use person::Person;
