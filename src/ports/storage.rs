use super::BoxError;
use async_trait::async_trait;
use std::path::Path;

/// Object storage scoped to a single bucket.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Download an object to a local path, creating parent directories as needed
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), BoxError>;

    /// Upload a local file to the given key, replacing any existing object
    async fn upload(&self, key: &str, local_path: &Path) -> Result<(), BoxError>;

    /// Remove an object
    async fn delete(&self, key: &str) -> Result<(), BoxError>;
}
