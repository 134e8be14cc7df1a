//! Store configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::StoreError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_SESSION_FILE: &str = ".postboard/session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_BASE_URL.to_owned(), session_file: PathBuf::from(DEFAULT_SESSION_FILE) }
    }
}

impl StoreConfig {
    /// Build typed store config from environment variables.
    ///
    /// Optional:
    /// - `POSTBOARD_API_BASE_URL`: default `http://localhost:3000/api`
    /// - `POSTBOARD_SESSION_FILE`: default `.postboard/session.json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, StoreError> {
        let api_base_url = parse_base_url(std::env::var("POSTBOARD_API_BASE_URL").ok().as_deref())?;
        let session_file = std::env::var("POSTBOARD_SESSION_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);
        Ok(Self { api_base_url, session_file })
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, StoreError> {
    let url = raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_API_BASE_URL);
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(StoreError::ConfigParse(format!("POSTBOARD_API_BASE_URL must be an http(s) URL: {url}")));
    }
    Ok(url.trim_end_matches('/').to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
