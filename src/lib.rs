//! Client-side session and post store for the posts API.
//!
//! DESIGN
//! ======
//! A single `SessionPostStore` owns the authenticated session, the last auth
//! status, and the post collection. Actions talk to the API through the
//! `Transport` seam and commit synchronous mutations on `StoreState`. The
//! session identity survives restarts through a `SessionStorage` slot.

pub mod config;
pub mod error;
pub mod model;
pub mod state;
pub mod storage;
pub mod store;
pub mod transport;

pub use config::StoreConfig;
pub use error::StoreError;
pub use model::{
    Credentials, ImageChange, ImageFile, LikePayload, NewPost, Post, PostId, PostUpdate, Session, Status,
    StoredSession,
};
pub use state::StoreState;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::SessionPostStore;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport};
