//! Durable storage for the single persisted session key.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store reads the key once at construction and writes or clears it on
//! login and logout. `FileStorage` backs the CLI; `MemoryStorage` serves
//! embedders and tests.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::model::StoredSession;

/// A single durable key-value slot holding the serialized session.
pub trait SessionStorage: Send + Sync {
    /// Raw stored value, `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn write(&self, raw: &str) -> Result<(), StoreError>;

    /// Clear the key. Clearing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be modified.
    fn remove(&self) -> Result<(), StoreError>;
}

// =============================================================================
// LOAD / SAVE
// =============================================================================

/// Parse the persisted session. An absent key yields the empty session.
///
/// # Errors
///
/// Returns `Storage` on read failure or `SessionParse` on malformed JSON.
pub fn load_stored_session(storage: &dyn SessionStorage) -> Result<StoredSession, StoreError> {
    match storage.read()? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(StoredSession::default()),
    }
}

/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_stored_session(storage: &dyn SessionStorage, stored: &StoredSession) -> Result<(), StoreError> {
    let raw = serde_json::to_string(stored)?;
    storage.write(&raw)
}

// =============================================================================
// FILE STORAGE
// =============================================================================

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, raw: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(raw: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(raw.into())) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock().clone())
    }

    fn write(&self, raw: &str) -> Result<(), StoreError> {
        *self.lock() = Some(raw.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
