//! Key-value blob storage scoped to one browser.
//!
//! Storage is abstracted behind [`BlobStorage`] so the cart store works the
//! same over the browser's session and over an in-memory map in tests.
//!
//! ## Implementations
//!
//! - [`SessionStorage`]: the browser's `tower-sessions` record (production)
//! - [`MemoryStorage`]: a shared `HashMap`, no cookies involved (tests)

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tower_sessions::Session;

/// Errors from the storage backend itself.
///
/// A blob that exists but cannot be decoded is not a storage error; the cart
/// store treats it as an empty cart.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Abstract interface for per-browser blob storage.
pub trait BlobStorage: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, blob: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the blob under `key` entirely.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Blob storage backed by the browser's session.
#[derive(Clone, Debug)]
pub struct SessionStorage {
    session: Session,
}

impl SessionStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl BlobStorage for SessionStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self.session.get_value(key).await?;
        Ok(value.map(|value| match value {
            serde_json::Value::String(blob) => blob,
            // Not something we wrote; hand it on so decoding rejects it.
            other => other.to_string(),
        }))
    }

    async fn write(&self, key: &str, blob: String) -> Result<(), StorageError> {
        self.session.insert(key, blob).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.session.remove_value(key).await?;
        Ok(())
    }
}

/// In-memory blob storage.
///
/// Clones share the same map, so two stores built from clones behave like two
/// pages of the same browser.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly, bypassing any encoding.
    pub fn insert_raw(&self, key: &str, blob: &str) {
        self.lock().insert(key.to_owned(), blob.to_owned());
    }

    /// Peek at a stored blob.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlobStorage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get_raw(key))
    }

    async fn write(&self, key: &str, blob: String) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), blob);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("cart").await.unwrap(), None);

        storage.write("cart", "[]".to_string()).await.unwrap();
        assert_eq!(storage.read("cart").await.unwrap().as_deref(), Some("[]"));

        storage.remove("cart").await.unwrap();
        assert_eq!(storage.read("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_state() {
        let catalog_page = MemoryStorage::new();
        let checkout_page = catalog_page.clone();

        catalog_page.write("cart", "[1]".to_string()).await.unwrap();
        assert_eq!(checkout_page.get_raw("cart").as_deref(), Some("[1]"));
    }
}
