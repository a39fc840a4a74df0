//! S3-compatible object store
//!
//! Talks to Amazon S3 (or MinIO and friends when a custom endpoint is
//! configured) through the rust-s3 crate.

use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tracing::{debug, info};

use super::{ObjectStore, StorageError};
use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// S3-compatible storage client.
///
/// Holds only credentials and region; a `Bucket` handle is built per call
/// since the bucket name comes from the request.
pub struct S3ObjectStore {
    region: Region,
    credentials: Credentials,
    path_style: bool,
}

impl S3ObjectStore {
    /// Create a new client from configuration
    pub fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create S3 credentials: {}", e)))?;

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse::<Region>()
                .map_err(|e| AppError::Internal(format!("Invalid region '{}': {}", config.region, e)))?,
        };

        // Custom endpoints are usually MinIO-style (http://endpoint/bucket)
        let path_style = config.endpoint.is_some();

        info!(
            "S3 client initialized for region: {}, endpoint: {}, path_style: {}",
            config.region,
            config.endpoint.as_deref().unwrap_or("default"),
            path_style
        );

        Ok(Self {
            region,
            credentials,
            path_style,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let mut bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(map_s3_error)?;
        if self.path_style {
            bucket.set_path_style();
        }
        Ok(bucket)
    }
}

/// Split rust-s3 failures into backend answers and everything else
fn map_s3_error(error: S3Error) -> StorageError {
    match error {
        S3Error::HttpFailWithBody(status, body) => StorageError::from_http_response(status, &body),
        other => StorageError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        let handle = self.bucket(bucket)?;
        match content_type {
            Some(content_type) => handle
                .put_object_with_content_type(key, &content, content_type)
                .await
                .map_err(map_s3_error)?,
            None => handle.put_object(key, &content).await.map_err(map_s3_error)?,
        };

        debug!(
            "Uploaded object '{}' ({} bytes) to bucket '{}'",
            key,
            content.len(),
            bucket
        );
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, StorageError> {
        let handle = self.bucket(bucket)?;
        let pages = handle
            .list(String::new(), None)
            .await
            .map_err(map_s3_error)?;

        let keys: Vec<String> = pages
            .into_iter()
            .flat_map(|page| page.contents.into_iter().map(|object| object.key))
            .collect();

        debug!("Listed {} objects in bucket '{}'", keys.len(), bucket);
        Ok(keys)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let handle = self.bucket(bucket)?;
        let response = handle.get_object(key).await.map_err(map_s3_error)?;

        debug!("Downloaded object '{}' from bucket '{}'", key, bucket);
        Ok(Bytes::from(response.to_vec()))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let handle = self.bucket(bucket)?;
        handle.delete_object(key).await.map_err(map_s3_error)?;

        debug!("Deleted object '{}' from bucket '{}'", key, bucket);
        Ok(())
    }
}
