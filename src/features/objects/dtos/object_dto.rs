use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::shared::constants::DOWNLOAD_MIME_TYPE;

/// Bucket and key addressing one object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct StorageLocator {
    /// Bucket name
    #[validate(length(min = 1, message = "bucket is required"))]
    pub bucket: String,
    /// Object key; may contain `/`
    #[validate(length(min = 1, message = "key is required"))]
    pub key: String,
}

impl StorageLocator {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Last `/`-delimited segment of the key, or the whole key
    pub fn file_name(&self) -> &str {
        display_filename(&self.key)
    }
}

/// Bucket-only path parameters
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct BucketPath {
    /// Bucket name
    #[validate(length(min = 1, message = "bucket is required"))]
    pub bucket: String,
}

/// Upload form for OpenAPI documentation.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadObjectDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// A validated upload ready for the object store
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub locator: StorageLocator,
    pub content: Bytes,
    pub content_type: Option<String>,
    pub original_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    /// Keys in the order the backend returned them
    pub files: Vec<String>,
}

/// Object content handed back as an attachment
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub bytes: Bytes,
    pub suggested_filename: String,
    pub mime_type: &'static str,
}

impl DownloadResult {
    pub fn new(bytes: Bytes, locator: &StorageLocator) -> Self {
        Self {
            bytes,
            suggested_filename: locator.file_name().to_string(),
            mime_type: DOWNLOAD_MIME_TYPE,
        }
    }
}

impl IntoResponse for DownloadResult {
    fn into_response(self) -> Response {
        let disposition = HeaderValue::from_str(&content_disposition(&self.suggested_filename))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(self.mime_type)),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Last `/`-delimited segment of `key`, or `key` itself when it has none
pub fn display_filename(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}

/// `Content-Disposition` value for an attachment.
///
/// Names that are not plain printable ASCII get an ASCII fallback plus an
/// RFC 5987 `filename*` parameter.
pub fn content_disposition(filename: &str) -> String {
    let is_plain = |c: char| (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\';

    if filename.chars().all(is_plain) {
        format!("attachment; filename=\"{}\"", filename)
    } else {
        let fallback: String = filename
            .chars()
            .map(|c| if is_plain(c) { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_filename() {
        assert_eq!(display_filename("a/b.png"), "b.png");
        assert_eq!(display_filename("backup_folder/2024/03/report.pdf"), "report.pdf");
        assert_eq!(display_filename("plain.txt"), "plain.txt");
        assert_eq!(display_filename("folder/"), "");
    }

    #[test]
    fn test_locator_validation() {
        assert!(StorageLocator::new("mybucket", "a/b.png").validate().is_ok());
        assert!(StorageLocator::new("", "a/b.png").validate().is_err());
        assert!(StorageLocator::new("mybucket", "").validate().is_err());
    }

    #[test]
    fn test_content_disposition_plain_name() {
        assert_eq!(
            content_disposition("b.png"),
            "attachment; filename=\"b.png\""
        );
        assert_eq!(
            content_disposition("my report.pdf"),
            "attachment; filename=\"my report.pdf\""
        );
    }

    #[test]
    fn test_content_disposition_non_ascii_name() {
        assert_eq!(
            content_disposition("café.txt"),
            "attachment; filename=\"caf_.txt\"; filename*=UTF-8''caf%C3%A9.txt"
        );
        assert_eq!(
            content_disposition("say \"hi\".txt"),
            "attachment; filename=\"say _hi_.txt\"; filename*=UTF-8''say%20%22hi%22.txt"
        );
    }
}
