//! Session, post, and request payload types.
//!
//! DESIGN
//! ======
//! Wire shapes follow the posts API (camelCase JSON). The image edit intent
//! is an explicit `ImageChange` variant rather than a sentinel string, so an
//! update always takes exactly one request path.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// SESSION
// =============================================================================

/// The authenticated user's identity and token. Empty fields mean logged out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub token: String,
    pub email: String,
    pub is_admin: bool,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Bearer token for the next request, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.is_authenticated().then(|| self.token.clone())
    }
}

/// Minimal session data kept in durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub token: String,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self { user_id: session.user_id.clone(), token: session.token.clone() }
    }
}

/// Login and signup credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: String,
    pub token: String,
}

/// Inner payload of `POST /auth/relog`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelogData {
    pub user_id: String,
    pub token: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelogResponse {
    pub data: RelogData,
}

// =============================================================================
// STATUS
// =============================================================================

/// Outcome of the most recent auth action. Displays as its wire tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    LoggedIn,
    Created,
    SignupFailed,
    LoginFailed,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Loading => "loading",
            Self::LoggedIn => "logedIn",
            Self::Created => "created",
            Self::SignupFailed => "error_user_path--signin",
            Self::LoginFailed => "error_user_path--login",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// POSTS
// =============================================================================

/// Post identifier; the API may send numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Num(i64),
    Str(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for PostId {
    fn from(value: i32) -> Self {
        Self::Num(i64::from(value))
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        value.parse::<i64>().map_or_else(|_| Self::Str(value.to_owned()), Self::Num)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub users_liked: Vec<String>,
}

impl Post {
    #[must_use]
    pub fn new(id: impl Into<PostId>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), image_url: None, user_id: None, likes: 0, users_liked: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SinglePostResponse {
    pub post: Post,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostDataResponse {
    pub data: Post,
}

// =============================================================================
// POST PAYLOADS
// =============================================================================

/// An image file attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// What an update does to the post's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    Keep,
    Remove,
    Replace(ImageFile),
}

/// Fields for `create_post`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub text: String,
    pub image: Option<ImageFile>,
}

/// Fields for `update_post_with_image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub id: PostId,
    pub text: String,
    pub image: ImageChange,
}

/// Fields for `like_post`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePayload {
    pub id: PostId,
    pub like: bool,
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
