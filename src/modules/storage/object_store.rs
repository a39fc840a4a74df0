use async_trait::async_trait;
use bytes::Bytes;

use super::StorageError;

/// Capability interface over an object-storage backend.
///
/// Implementations hold no per-request state and are shared across
/// concurrent requests behind an `Arc`.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store `content` at (bucket, key), recording `content_type` when given
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    /// List every key in the bucket, in backend order
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, StorageError>;

    /// Fetch the full content of an object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError>;

    /// Delete an object. Deleting a missing key succeeds.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}
