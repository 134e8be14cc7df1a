//! Session and post store synchronized with the posts API.
//!
//! DESIGN
//! ======
//! Actions issue requests through the `Transport` and then commit mutations
//! on `StoreState`. Each commit takes the state write lock for the length of
//! one mutation only and never across a network await, so concurrent actions
//! interleave at mutation granularity and the last commit wins.
//!
//! Every request carries the bearer token read from the session when the
//! action starts. Logging in therefore never alters requests that are
//! already in flight.
//!
//! ERROR HANDLING
//! ==============
//! Actions resolve with the raw `ApiResponse` or return the transport error
//! unchanged. Auth actions record a failure `Status` first; post actions have
//! no status side effect.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::{
    Credentials, ImageChange, ImageFile, LikePayload, LoginResponse, NewPost, Post, PostDataResponse, PostId,
    PostUpdate, RelogResponse, Session, SinglePostResponse, Status, StoredSession,
};
use crate::state::StoreState;
use crate::storage::{self, FileStorage, SessionStorage};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

pub struct SessionPostStore {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn SessionStorage>,
    state: RwLock<StoreState>,
}

impl SessionPostStore {
    /// Create a store, seeding the session from durable storage.
    ///
    /// A missing or unreadable persisted session yields an empty session.
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn SessionStorage>) -> Self {
        let stored = storage::load_stored_session(storage.as_ref()).unwrap_or_else(|error| {
            tracing::warn!(%error, "ignoring unreadable persisted session");
            StoredSession::default()
        });
        Self { transport, storage, state: RwLock::new(StoreState::from_stored(stored)) }
    }

    /// Build a store backed by `reqwest` and a session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let transport = HttpTransport::new(&config.api_base_url)?;
        let storage = FileStorage::new(&config.session_file);
        Ok(Self::new(Arc::new(transport), Arc::new(storage)))
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    pub async fn state(&self) -> StoreState {
        self.state.read().await.clone()
    }

    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.status
    }

    /// Current post collection; `None` before the first `list_posts`.
    pub async fn posts(&self) -> Option<Vec<Post>> {
        self.state.read().await.posts.clone()
    }

    // =========================================================================
    // COMMITS
    // =========================================================================

    async fn commit<F>(&self, mutation: F)
    where
        F: FnOnce(&mut StoreState),
    {
        let mut state = self.state.write().await;
        mutation(&mut state);
    }

    /// Replace the session and persist its identity to durable storage.
    async fn commit_login(&self, login: &LoginResponse) {
        let stored = {
            let mut state = self.state.write().await;
            state.apply_login(login);
            StoredSession::from(&state.session)
        };
        if let Err(error) = storage::save_stored_session(self.storage.as_ref(), &stored) {
            tracing::warn!(%error, "failed to persist session");
        }
    }

    /// Clear durable storage and reset the session.
    async fn commit_logout(&self) {
        self.forget_stored_session();
        self.commit(StoreState::clear_session).await;
    }

    fn forget_stored_session(&self) {
        if let Err(error) = self.storage.remove() {
            tracing::warn!(%error, "failed to clear persisted session");
        }
    }

    async fn bearer(&self) -> Option<String> {
        self.state.read().await.session.bearer()
    }

    async fn send_authed(&self, request: ApiRequest) -> Result<ApiResponse, StoreError> {
        let bearer = self.bearer().await;
        self.transport.send(request.bearer(bearer)).await
    }

    // =========================================================================
    // AUTH ACTIONS
    // =========================================================================

    /// `POST /auth/signup`.
    ///
    /// # Errors
    ///
    /// Returns the transport error after setting `Status::SignupFailed`.
    pub async fn create_account(&self, credentials: &Credentials) -> Result<ApiResponse, StoreError> {
        let request = ApiRequest::new(Method::POST, "/auth/signup").json(credentials_body(credentials));
        match self.transport.send(request).await {
            Ok(response) => {
                self.commit(|s| s.set_status(Status::Created)).await;
                Ok(response)
            }
            Err(error) => {
                self.commit(|s| s.set_status(Status::SignupFailed)).await;
                Err(error)
            }
        }
    }

    /// `POST /auth/login`, then adopt the returned session.
    ///
    /// # Errors
    ///
    /// Returns the transport or parse error after setting `Status::LoginFailed`.
    pub async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, StoreError> {
        self.commit(|s| s.set_status(Status::Loading)).await;
        let request = ApiRequest::new(Method::POST, "/auth/login").json(credentials_body(credentials));
        let result = self.transport.send(request).await.and_then(|response| {
            let login = response.parse::<LoginResponse>()?;
            Ok((response, login))
        });

        match result {
            Ok((response, login)) => {
                self.commit(|s| s.set_status(Status::LoggedIn)).await;
                self.commit_login(&login).await;
                self.commit(|s| s.register_email(credentials.email.clone())).await;
                tracing::info!(user_id = %login.user_id, "logged in");
                Ok(response)
            }
            Err(error) => {
                self.commit(|s| s.set_status(Status::LoginFailed)).await;
                tracing::info!(%error, "login failed");
                Err(error)
            }
        }
    }

    /// Reset status and session and clear the persisted key. No request.
    pub async fn logout(&self) {
        self.commit(|s| s.set_status(Status::Idle)).await;
        self.commit_logout().await;
        tracing::info!("logged out");
    }

    /// `POST /auth/relog` with the stored token, then adopt the refreshed session.
    ///
    /// # Errors
    ///
    /// Returns the transport or parse error after setting `Status::LoginFailed`
    /// and clearing durable storage.
    pub async fn relog(&self, stored: &StoredSession) -> Result<ApiResponse, StoreError> {
        let request = ApiRequest::new(Method::POST, "/auth/relog")
            .bearer(Some(stored.token.clone()))
            .json(json!({ "userId": stored.user_id, "token": stored.token }));
        let result = self.transport.send(request).await.and_then(|response| {
            let relog = response.parse::<RelogResponse>()?;
            Ok((response, relog.data))
        });

        match result {
            Ok((response, data)) => {
                let login = LoginResponse { user_id: data.user_id, token: data.token };
                self.commit(|s| s.set_status(Status::LoggedIn)).await;
                self.commit_login(&login).await;
                self.commit(|s| s.register_email(data.email)).await;
                tracing::info!(user_id = %login.user_id, "session restored");
                Ok(response)
            }
            Err(error) => {
                self.commit(|s| s.set_status(Status::LoginFailed)).await;
                self.forget_stored_session();
                tracing::info!(%error, "relog failed");
                Err(error)
            }
        }
    }

    // =========================================================================
    // POST ACTIONS
    // =========================================================================

    /// `GET /post`, replacing the collection.
    ///
    /// # Errors
    ///
    /// Returns the transport or parse error; state is unchanged.
    pub async fn list_posts(&self) -> Result<ApiResponse, StoreError> {
        let response = self.send_authed(ApiRequest::new(Method::GET, "/post")).await?;
        let posts = response.parse::<Vec<Post>>()?;
        self.commit(|s| s.set_posts(posts)).await;
        Ok(response)
    }

    /// `GET /post/:id`, replacing the matching post in place.
    ///
    /// # Errors
    ///
    /// Returns the transport or parse error; state is unchanged.
    pub async fn fetch_post(&self, id: &PostId) -> Result<ApiResponse, StoreError> {
        let response = self.send_authed(ApiRequest::new(Method::GET, post_path(id))).await?;
        let single = response.parse::<SinglePostResponse>()?;
        self.commit(|s| s.upsert_post(single.post)).await;
        Ok(response)
    }

    /// `POST /post`, inserting the created post at the head.
    ///
    /// # Errors
    ///
    /// Returns the transport or parse error; state is unchanged.
    pub async fn create_post(&self, fields: NewPost) -> Result<ApiResponse, StoreError> {
        let request = ApiRequest::new(Method::POST, "/post");
        let request = match fields.image {
            Some(image) => request.multipart(&fields.text, image),
            None => request.json(json!({ "text": fields.text })),
        };
        let response = self.send_authed(request).await?;
        let created = response.parse::<PostDataResponse>()?;
        self.commit(|s| s.prepend_post(created.data)).await;
        Ok(response)
    }

    /// `PUT /post/:id` with an explicit image intent, then refresh the post.
    ///
    /// # Errors
    ///
    /// Returns the error of the `PUT`; a failed refresh is only logged.
    pub async fn update_post_with_image(&self, fields: PostUpdate) -> Result<ApiResponse, StoreError> {
        let request = ApiRequest::new(Method::PUT, post_path(&fields.id));
        let request = match fields.image {
            ImageChange::Keep => request.json(json!({ "text": fields.text })),
            ImageChange::Remove => request.json(json!({ "text": fields.text, "image": "" })),
            ImageChange::Replace(image) => request.multipart(&fields.text, image),
        };
        let response = self.send_authed(request).await?;
        self.refresh_post(&fields.id).await;
        Ok(response)
    }

    /// `PUT /post/:id` for a post edited without an existing image: no file
    /// sends an empty image, a file replaces it. Then refresh the post.
    ///
    /// # Errors
    ///
    /// Returns the error of the `PUT`; a failed refresh is only logged.
    pub async fn update_post_without_image(
        &self,
        id: &PostId,
        text: &str,
        image: Option<ImageFile>,
    ) -> Result<ApiResponse, StoreError> {
        let request = ApiRequest::new(Method::PUT, post_path(id));
        let request = match image {
            Some(image) => request.multipart(text, image),
            None => request.json(json!({ "text": text, "image": "" })),
        };
        let response = self.send_authed(request).await?;
        self.refresh_post(id).await;
        Ok(response)
    }

    /// `DELETE /post/:id`, removing every local post with that id.
    ///
    /// # Errors
    ///
    /// Returns the transport error; state is unchanged.
    pub async fn delete_post(&self, id: &PostId) -> Result<ApiResponse, StoreError> {
        let response = self.send_authed(ApiRequest::new(Method::DELETE, post_path(id))).await?;
        self.commit(|s| s.remove_post(id)).await;
        Ok(response)
    }

    /// `POST /post/:id/like`, then refresh the post.
    ///
    /// # Errors
    ///
    /// Returns the error of the like request; a failed refresh is only logged.
    pub async fn like_post(&self, payload: &LikePayload) -> Result<ApiResponse, StoreError> {
        let path = format!("{}/like", post_path(&payload.id));
        let request = ApiRequest::new(Method::POST, path).json(json!({ "like": payload.like }));
        let response = self.send_authed(request).await?;
        self.refresh_post(&payload.id).await;
        Ok(response)
    }

    async fn refresh_post(&self, id: &PostId) {
        if let Err(error) = self.fetch_post(id).await {
            tracing::warn!(post_id = %id, %error, "post refresh failed");
        }
    }
}

fn post_path(id: &PostId) -> String {
    format!("/post/{id}")
}

fn credentials_body(credentials: &Credentials) -> serde_json::Value {
    json!({ "email": credentials.email, "password": credentials.password })
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
