//! Object storage for generated media and brand assets.
//!
//! [`ObjectStore`] is the seam the pipeline and API depend on. [`S3Store`]
//! talks to any S3-compatible endpoint; [`MemoryStore`] keeps objects in a
//! map for tests and local development.

pub mod config;
pub mod error;
pub mod memory;
pub mod s3;

use async_trait::async_trait;

pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use s3::S3Store;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> StorageResult<String>;

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Remove an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    fn public_url(&self, key: &str) -> String;
}

/// Reject keys that could escape the bucket prefix or are empty.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|seg| seg == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
