//! HTTP client for the gateway
//!
//! Issues exactly one request per operation and separates transport
//! failures (nothing came back) from application errors (a non-2xx answer).

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::features::objects::dtos::{BucketPath, FileListResponse, StorageLocator};
use crate::shared::constants::FILE_FIELD_NAME;
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The gateway could not be reached or the exchange broke off
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status
    #[error("Request failed (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

/// A downloaded object and the name to save it under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub content: Bytes,
}

pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConsoleError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `<base>/<operation>/<segment>/...` with every segment percent-encoded,
    /// so keys containing `/` or reserved characters travel as one segment
    fn url(&self, operation: &str, segments: &[&str]) -> String {
        let mut url = format!("{}/{}", self.base_url, operation);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    pub async fn upload(
        &self,
        locator: &StorageLocator,
        file_name: &str,
        content: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, ConsoleError> {
        validate(locator)?;
        if file_name.is_empty() {
            return Err(ConsoleError::Input("file name is required".to_string()));
        }

        let mut part = Part::bytes(content).file_name(file_name.to_string());
        if let Some(content_type) = content_type {
            part = part.mime_str(content_type)?;
        }
        // Send the filename as typed, the way browsers do
        let form = Form::new().percent_encode_noop().part(FILE_FIELD_NAME, part);

        let url = self.url("upload", &[&locator.bucket, &locator.key]);
        debug!("POST {}", url);
        let response = check(self.http.post(&url).multipart(form).send().await?).await?;

        Ok(response.json::<MessageResponse>().await?.message)
    }

    pub async fn list(&self, bucket: &str) -> Result<Vec<String>, ConsoleError> {
        validate(&BucketPath {
            bucket: bucket.to_string(),
        })?;

        let url = self.url("list", &[bucket]);
        debug!("GET {}", url);
        let response = check(self.http.get(&url).send().await?).await?;

        Ok(response.json::<FileListResponse>().await?.files)
    }

    pub async fn download(&self, locator: &StorageLocator) -> Result<DownloadedFile, ConsoleError> {
        validate(locator)?;

        let url = self.url("download", &[&locator.bucket, &locator.key]);
        debug!("GET {}", url);
        let response = check(self.http.get(&url).send().await?).await?;

        Ok(DownloadedFile {
            file_name: locator.file_name().to_string(),
            content: response.bytes().await?,
        })
    }

    pub async fn delete(&self, locator: &StorageLocator) -> Result<String, ConsoleError> {
        validate(locator)?;

        let url = self.url("delete", &[&locator.bucket, &locator.key]);
        debug!("DELETE {}", url);
        let response = check(self.http.delete(&url).send().await?).await?;

        Ok(response.json::<MessageResponse>().await?.message)
    }
}

fn validate<T: Validate>(input: &T) -> Result<(), ConsoleError> {
    input
        .validate()
        .map_err(|e| ConsoleError::Input(e.to_string()))
}

/// Turn a non-2xx answer into `ConsoleError::Api`, preferring the `error` field of the body
async fn check(response: Response) -> Result<Response, ConsoleError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    Err(ConsoleError::Api {
        status: status.as_u16(),
        message,
    })
}
