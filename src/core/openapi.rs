use utoipa::{Modify, OpenApi};

use crate::features::objects::{dtos as objects_dtos, handlers as objects_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        objects_handlers::upload_object,
        objects_handlers::list_objects,
        objects_handlers::download_object,
        objects_handlers::delete_object,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            objects_dtos::UploadObjectDto,
            objects_dtos::FileListResponse,
        )
    ),
    tags(
        (name = "objects", description = "Upload, list, download and delete objects"),
    ),
    info(
        title = "Bucket Gateway API",
        version = "0.1.0",
        description = "Upload, list, download and delete objects in S3 buckets",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
