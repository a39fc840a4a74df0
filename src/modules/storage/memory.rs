//! In-process object store
//!
//! Mirrors the S3 behaviours the gateway relies on: unknown buckets are
//! rejected, missing keys surface as `NoSuchKey`, deletes are idempotent and
//! listings come back in key order.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

use super::{ObjectStore, StorageError};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    content_type: Option<String>,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<HashMap<String, BTreeMap<String, StoredObject>>>,
    auto_create_buckets: bool,
}

impl MemoryObjectStore {
    /// Store that only accepts buckets created through `create_bucket`
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that creates a bucket the first time an object is written to it
    pub fn with_auto_create_buckets() -> Self {
        Self {
            auto_create_buckets: true,
            ..Self::default()
        }
    }

    pub async fn create_bucket(&self, bucket: &str) {
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default();
    }

    /// Content type recorded for an object, if any
    pub async fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.buckets
            .read()
            .await
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .and_then(|object| object.content_type.clone())
    }
}

fn no_such_bucket() -> StorageError {
    StorageError::service(404, "NoSuchBucket", "The specified bucket does not exist")
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        let mut buckets = self.buckets.write().await;
        if self.auto_create_buckets && !buckets.contains_key(bucket) {
            debug!("Creating bucket '{}'", bucket);
            buckets.insert(bucket.to_string(), BTreeMap::new());
        }
        let objects = buckets.get_mut(bucket).ok_or_else(no_such_bucket)?;
        debug!("Stored object '{}' ({} bytes) in '{}'", key, content.len(), bucket);
        objects.insert(
            key.to_string(),
            StoredObject {
                content,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, StorageError> {
        let buckets = self.buckets.read().await;
        let objects = buckets.get(bucket).ok_or_else(no_such_bucket)?;
        Ok(objects.keys().cloned().collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let buckets = self.buckets.read().await;
        let objects = buckets.get(bucket).ok_or_else(no_such_bucket)?;
        objects
            .get(key)
            .map(|object| object.content.clone())
            .ok_or_else(|| {
                StorageError::service(404, "NoSuchKey", "The specified key does not exist.")
            })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let mut buckets = self.buckets.write().await;
        let objects = buckets.get_mut(bucket).ok_or_else(no_such_bucket)?;
        objects.remove(key);
        Ok(())
    }
}
