use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::objects::handlers::{
    delete_object, download_object, list_objects, upload_object,
};
use crate::features::objects::services::ObjectService;

/// Create routes for the objects feature
///
/// `{*key}` captures the rest of the path, so keys keep their `/` separators.
pub fn routes(object_service: Arc<ObjectService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/upload/{bucket}/{*key}",
            post(upload_object).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/list/{bucket}", get(list_objects))
        .route("/download/{bucket}/{*key}", get(download_object))
        .route("/delete/{bucket}/{*key}", delete(delete_object))
        .with_state(object_service)
}
