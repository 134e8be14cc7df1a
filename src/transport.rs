//! HTTP seam between the store and the posts API.
//!
//! DESIGN
//! ======
//! The store builds `ApiRequest` values and hands them to a `Transport`.
//! Credentials travel on each request (`bearer`) instead of living in a
//! shared client default, so a login never changes the header of a request
//! that is already in flight. `HttpTransport` is the `reqwest` implementation;
//! tests substitute a scripted transport.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::model::ImageFile;

pub use reqwest::Method;

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart form with a JSON-encoded `post` field and an `image` file.
    Multipart { post: String, image: ImageFile },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `/post/3`.
    pub path: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), bearer: None, body: RequestBody::Empty }
    }

    #[must_use]
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Attach `text` and `image` as the multipart post form.
    #[must_use]
    pub fn multipart(mut self, text: &str, image: ImageFile) -> Self {
        self.body = RequestBody::Multipart { post: post_field(text), image };
        self
    }
}

/// JSON value of the multipart `post` field.
#[must_use]
pub fn post_field(text: &str) -> String {
    serde_json::json!({ "text": text }).to_string()
}

/// Raw API response an action resolves with.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed shape.
    ///
    /// # Errors
    ///
    /// Returns `ApiParse` if the body does not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.body.clone()).map_err(|e| StoreError::ApiParse(e.to_string()))
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Sends one API request and returns its response.
///
/// Implementations map non-success statuses to `StoreError::ApiResponse`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns a `StoreError` on transport failure or a non-success status.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, StoreError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the `reqwest` client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder().build().map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder, StoreError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method, url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder.json(&json),
            RequestBody::Multipart { post, image } => {
                let mut part = reqwest::multipart::Part::bytes(image.bytes).file_name(image.file_name);
                if let Some(content_type) = image.content_type {
                    part = part.mime_str(&content_type)?;
                }
                let form = reqwest::multipart::Form::new().text("post", post).part("image", part);
                builder.multipart(form)
            }
        };
        Ok(builder)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, StoreError> {
        tracing::debug!(method = %request.method, path = %request.path, "api request");
        let response = self.build(request)?.send().await?;

        let status = response.status();
        let text = response.text().await?;
        let body = parse_body(&text);

        if !status.is_success() {
            return Err(StoreError::ApiResponse { status: status.as_u16(), body });
        }
        Ok(ApiResponse { status: status.as_u16(), body })
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
