//! In-memory store state and its mutations.
//!
//! DESIGN
//! ======
//! Mutations are plain synchronous methods on `StoreState`. The store applies
//! each one under its own write-lock acquisition, which is what makes them
//! atomic relative to each other. Environment side effects of logging in
//! (durable storage) live in the store, not here.

use crate::model::{LoginResponse, Post, PostId, Session, Status, StoredSession};

// =============================================================================
// STORE STATE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub status: Status,
    pub session: Session,
    /// `None` until the first bulk fetch.
    pub posts: Option<Vec<Post>>,
}

impl StoreState {
    /// Initial state for a store whose durable storage held `stored`.
    #[must_use]
    pub fn from_stored(stored: StoredSession) -> Self {
        Self {
            status: Status::Idle,
            session: Session { user_id: stored.user_id, token: stored.token, email: String::new(), is_admin: false },
            posts: None,
        }
    }

    // =========================================================================
    // SESSION MUTATIONS
    // =========================================================================

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn register_email(&mut self, email: impl Into<String>) {
        self.session.email = email.into();
    }

    /// Replace the session wholesale. Email and admin flag are reset.
    pub fn apply_login(&mut self, login: &LoginResponse) {
        self.session =
            Session { user_id: login.user_id.clone(), token: login.token.clone(), email: String::new(), is_admin: false };
    }

    pub fn clear_session(&mut self) {
        self.session = Session::default();
    }

    // =========================================================================
    // POST MUTATIONS
    // =========================================================================

    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = Some(posts);
    }

    /// Replace the first post with a matching id. Absent ids are ignored.
    pub fn upsert_post(&mut self, post: Post) {
        let Some(posts) = self.posts.as_mut() else {
            return;
        };
        if let Some(slot) = posts.iter_mut().find(|p| p.id == post.id) {
            *slot = post;
        }
    }

    pub fn prepend_post(&mut self, post: Post) {
        self.posts.get_or_insert_with(Vec::new).insert(0, post);
    }

    /// Remove every post with this id, not just the first.
    pub fn remove_post(&mut self, id: &PostId) {
        if let Some(posts) = self.posts.as_mut() {
            posts.retain(|p| &p.id != id);
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
