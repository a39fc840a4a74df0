use axum::{
    extract::{multipart::MultipartError, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::{AppMultipart, AppPath};
use crate::features::objects::dtos::{
    BucketPath, DownloadResult, FileListResponse, StorageLocator, UploadRequest,
};
use crate::features::objects::services::ObjectService;
use crate::shared::constants::{
    FILE_FIELD_NAME, NO_FILE_PART_MESSAGE, NO_SELECTED_FILE_MESSAGE, UPLOAD_TOO_LARGE_MESSAGE,
};
use crate::shared::types::{ErrorResponse, MessageResponse};

/// Upload a file
///
/// Accepts multipart/form-data with a `file` part. The part's content type,
/// when present, is stored with the object.
#[utoipa::path(
    post,
    path = "/upload/{bucket}/{key}",
    tag = "objects",
    params(StorageLocator),
    request_body(
        content = crate::features::objects::dtos::UploadObjectDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "File uploaded", body = MessageResponse),
        (status = 400, description = "Missing file part or empty filename", body = ErrorResponse),
        (status = 413, description = "Upload larger than the configured body limit", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_object(
    State(service): State<Arc<ObjectService>>,
    AppPath(locator): AppPath<StorageLocator>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<MessageResponse>, AppError> {
    locator
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut upload: Option<UploadRequest> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Only the first `file` part counts; a part without a filename is a plain form value
        if upload.is_some() || field.name() != Some(FILE_FIELD_NAME) {
            debug!("Ignoring multipart field: {:?}", field.name());
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!("Ignoring `file` field without a filename");
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let content = field.bytes().await.map_err(multipart_error)?;

        upload = Some(UploadRequest {
            locator: locator.clone(),
            content,
            content_type,
            original_filename: file_name,
        });
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest(NO_FILE_PART_MESSAGE.to_string()))?;
    if upload.original_filename.is_empty() {
        return Err(AppError::BadRequest(NO_SELECTED_FILE_MESSAGE.to_string()));
    }

    Ok(Json(service.upload(upload).await?))
}

/// Oversized bodies hit the `DefaultBodyLimit` while streaming and surface here as 413
fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(UPLOAD_TOO_LARGE_MESSAGE.to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

/// List the keys in a bucket
#[utoipa::path(
    get,
    path = "/list/{bucket}",
    tag = "objects",
    params(BucketPath),
    responses(
        (status = 200, description = "Keys in the bucket (possibly empty)", body = FileListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_objects(
    State(service): State<Arc<ObjectService>>,
    AppPath(path): AppPath<BucketPath>,
) -> Result<Json<FileListResponse>, AppError> {
    path.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(service.list(&path.bucket).await?))
}

/// Download an object as an attachment
#[utoipa::path(
    get,
    path = "/download/{bucket}/{key}",
    tag = "objects",
    params(StorageLocator),
    responses(
        (status = 200, description = "Object content", content_type = "application/octet-stream"),
        (status = 404, description = "Object not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn download_object(
    State(service): State<Arc<ObjectService>>,
    AppPath(locator): AppPath<StorageLocator>,
) -> Result<DownloadResult, AppError> {
    locator
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.download(&locator).await
}

/// Delete an object
///
/// Deleting a key that does not exist succeeds.
#[utoipa::path(
    delete,
    path = "/delete/{bucket}/{key}",
    tag = "objects",
    params(StorageLocator),
    responses(
        (status = 200, description = "Object deleted", body = MessageResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_object(
    State(service): State<Arc<ObjectService>>,
    AppPath(locator): AppPath<StorageLocator>,
) -> Result<Json<MessageResponse>, AppError> {
    locator
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(service.delete(&locator).await?))
}
