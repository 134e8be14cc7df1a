//! Store error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures are surfaced to the caller as-is: no retry, no
//! refinement beyond the HTTP status carried by `ApiResponse`. A malformed
//! persisted session is the one error recovered locally (see `storage`).

/// Errors produced by store actions, the transport, and configuration.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, DNS, body read).
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: serde_json::Value },

    /// A success body did not have the documented shape.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// Durable session storage could not be read or written.
    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    /// The persisted session entry is not valid JSON.
    #[error("persisted session is malformed: {0}")]
    SessionParse(#[from] serde_json::Error),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// No persisted session is available to act on.
    #[error("no persisted session; log in first")]
    NotAuthenticated,
}

impl StoreError {
    /// HTTP status of an API error response, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            Self::Request(error) => error.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
