use std::sync::Arc;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::objects::dtos::{
    DownloadResult, FileListResponse, StorageLocator, UploadRequest,
};
use crate::modules::storage::ObjectStore;
use crate::shared::types::MessageResponse;

/// Service for object operations.
///
/// Each call is a single passthrough to the object store; failures are
/// converted to `AppError` here so handlers stay thin.
pub struct ObjectService {
    store: Arc<dyn ObjectStore>,
}

impl ObjectService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Store an uploaded file at its locator
    pub async fn upload(&self, request: UploadRequest) -> Result<MessageResponse> {
        let UploadRequest {
            locator,
            content,
            content_type,
            original_filename,
        } = request;
        let size = content.len();

        self.store
            .put_object(
                &locator.bucket,
                &locator.key,
                content,
                content_type.as_deref(),
            )
            .await?;

        info!(
            "Uploaded '{}' to {}/{} ({} bytes, content_type={})",
            original_filename,
            locator.bucket,
            locator.key,
            size,
            content_type.as_deref().unwrap_or("-")
        );

        Ok(MessageResponse::new(format!(
            "File {} uploaded successfully to {}/{}",
            original_filename, locator.bucket, locator.key
        )))
    }

    /// List every key in a bucket
    pub async fn list(&self, bucket: &str) -> Result<FileListResponse> {
        let files = self.store.list_objects(bucket).await?;
        debug!("Listed {} objects in bucket '{}'", files.len(), bucket);

        Ok(FileListResponse { files })
    }

    /// Fetch an object into memory.
    ///
    /// A missing object is reported as 404; every other backend failure keeps
    /// the generic mapping.
    pub async fn download(&self, locator: &StorageLocator) -> Result<DownloadResult> {
        let bytes = self
            .store
            .get_object(&locator.bucket, &locator.key)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    debug!("Object {}/{} not found: {}", locator.bucket, locator.key, e);
                    AppError::NotFound(format!("File not found: {}", locator.key))
                } else {
                    AppError::Storage(e)
                }
            })?;

        debug!(
            "Downloaded {}/{} ({} bytes)",
            locator.bucket,
            locator.key,
            bytes.len()
        );
        Ok(DownloadResult::new(bytes, locator))
    }

    /// Delete an object; deleting a missing key succeeds
    pub async fn delete(&self, locator: &StorageLocator) -> Result<MessageResponse> {
        self.store
            .delete_object(&locator.bucket, &locator.key)
            .await?;

        info!("Deleted {}/{}", locator.bucket, locator.key);
        Ok(MessageResponse::new(format!(
            "{} deleted successfully from {}",
            locator.key, locator.bucket
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::{MemoryObjectStore, StorageError};
    use async_trait::async_trait;
    use bytes::Bytes;

    /// Store whose every call fails with the given error
    struct FailingStore(StorageError);

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn put_object(
            &self,
            _bucket: &str,
            _key: &str,
            _content: Bytes,
            _content_type: Option<&str>,
        ) -> std::result::Result<(), StorageError> {
            Err(self.0.clone())
        }

        async fn list_objects(&self, _bucket: &str) -> std::result::Result<Vec<String>, StorageError> {
            Err(self.0.clone())
        }

        async fn get_object(&self, _bucket: &str, _key: &str) -> std::result::Result<Bytes, StorageError> {
            Err(self.0.clone())
        }

        async fn delete_object(&self, _bucket: &str, _key: &str) -> std::result::Result<(), StorageError> {
            Err(self.0.clone())
        }
    }

    fn upload_request(bucket: &str, key: &str, content: &'static [u8]) -> UploadRequest {
        UploadRequest {
            locator: StorageLocator::new(bucket, key),
            content: Bytes::from_static(content),
            content_type: Some("image/png".to_string()),
            original_filename: "b.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_then_download_round_trips() {
        let store = Arc::new(MemoryObjectStore::new());
        store.create_bucket("mybucket").await;
        let service = ObjectService::new(store.clone());

        let response = service
            .upload(upload_request("mybucket", "a/b.png", b"\x89PNG"))
            .await
            .unwrap();
        assert_eq!(
            response.message,
            "File b.png uploaded successfully to mybucket/a/b.png"
        );
        assert_eq!(
            store.content_type("mybucket", "a/b.png").await.as_deref(),
            Some("image/png")
        );

        let download = service
            .download(&StorageLocator::new("mybucket", "a/b.png"))
            .await
            .unwrap();
        assert_eq!(download.bytes, Bytes::from_static(b"\x89PNG"));
        assert_eq!(download.suggested_filename, "b.png");
        assert_eq!(download.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_download_missing_object_is_not_found() {
        let store = Arc::new(MemoryObjectStore::new());
        store.create_bucket("mybucket").await;
        let service = ObjectService::new(store);

        let err = service
            .download(&StorageLocator::new("mybucket", "missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "File not found: missing.txt"));
    }

    #[tokio::test]
    async fn test_download_missing_bucket_stays_backend_error() {
        let service = ObjectService::new(Arc::new(MemoryObjectStore::new()));

        let err = service
            .download(&StorageLocator::new("nobucket", "a.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Service { ref code, .. }) if code == "NoSuchBucket"));
    }

    #[tokio::test]
    async fn test_not_found_only_special_cased_for_download() {
        let not_found = StorageError::service(404, "NoSuchKey", "The specified key does not exist.");
        let service = ObjectService::new(Arc::new(FailingStore(not_found)));
        let locator = StorageLocator::new("mybucket", "a.txt");

        let err = service.delete(&locator).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        let err = service.list("mybucket").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        let err = service.download(&locator).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let service = ObjectService::new(Arc::new(FailingStore(StorageError::Transport(
            "connection refused".to_string(),
        ))));

        let err = service
            .upload(upload_request("mybucket", "a/b.png", b"x"))
            .await
            .unwrap_err();
        assert_eq!(err.status_and_message().1, "connection refused");
    }

    #[tokio::test]
    async fn test_delete_reports_key_and_bucket() {
        let store = Arc::new(MemoryObjectStore::new());
        store.create_bucket("mybucket").await;
        let service = ObjectService::new(store);

        let response = service
            .delete(&StorageLocator::new("mybucket", "a/b.png"))
            .await
            .unwrap();
        assert_eq!(response.message, "a/b.png deleted successfully from mybucket");
    }
}
