//! Request factories for the standard OpenSocial services.
//!
//! Each factory returns a ready-to-send [`crate::Request`] with its REST
//! template, JSON-RPC method, HTTP verb, default components, and expected
//! model kind filled in. Factories never perform I/O.
//!
//! | Module | REST template | RPC |
//! |--------|---------------|-----|
//! | [`people`] | `people/{guid}/{selector}/{pid}` | `people.get` |
//! | [`activities`] | `activities/{guid}/{selector}/{appid}/{activityid}` | `activities.*` |
//! | [`app_data`] | `appdata/{guid}/{selector}/{appid}` | `appdata.*` |
//! | [`groups`] | `groups/{guid}` | `groups.get`, `groups.getSupportedFields` |
//! | [`albums`] | `albums/{guid}/{groupId}/{albumId}` | `albums.*` |
//! | [`media_items`] | `mediaitems/{guid}/{groupId}/{albumId}/{itemId}` | `mediaItems.*` |
//! | [`notifications`] | `notifications/{guid}/{groupId}` | REST only |
//! | [`status_mood`] | `statusmood/{guid}/{groupId}/{friendId}/{moodId}/{history}` | REST only |
//! | [`profile_comments`] | `profilecomments/{guid}/{groupId}` | REST only |

pub mod activities;
pub mod albums;
pub mod app_data;
pub mod groups;
pub mod media_items;
pub mod notifications;
pub mod people;
pub mod profile_comments;
pub mod status_mood;

/// The authenticated user.
pub const ME: &str = "@me";
/// The user viewing the application.
pub const VIEWER: &str = "@viewer";
/// The owner of the page the application runs on.
pub const OWNER: &str = "@owner";
/// The user themself, as a group selector.
pub const SELF: &str = "@self";
/// The user's friends, as a group selector.
pub const FRIENDS: &str = "@friends";
/// Everyone related to the user, as a group selector.
pub const ALL: &str = "@all";
/// The calling application.
pub const APP: &str = "@app";
/// Group id listing the moods a container supports.
pub const SUPPORTED_MOOD: &str = "@supportedMood";
