use axum::{http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{AppConfig, SwaggerConfig};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::objects::{routes as objects_routes, ObjectService};
use crate::shared::types::ErrorResponse;

/// Simple health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
        }),
    )
}

/// Assemble the full application: object routes, docs, health and the shared layers
pub fn build_router(
    object_service: Arc<ObjectService>,
    app_config: &AppConfig,
    swagger_config: &SwaggerConfig,
) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: swagger_config.title.clone(),
        version: swagger_config.version.clone(),
        description: swagger_config.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(objects_routes(
            object_service,
            app_config.max_request_body_size,
        ))
        .route("/health", get(health_check))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::cors_layer(&app_config.cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::modules::storage::MemoryObjectStore;
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;
    use serde_json::Value;
    use uuid::Uuid;

    pub(crate) fn test_config() -> Config {
        Config::from_lookup(|name| match name {
            "STORAGE_BACKEND" => Some("memory".to_string()),
            _ => None,
        })
        .unwrap()
    }

    /// Full application backed by an in-memory store
    pub(crate) fn test_app(store: Arc<MemoryObjectStore>) -> Router {
        let config = test_config();
        build_router(
            Arc::new(ObjectService::new(store)),
            &config.app,
            &config.swagger,
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = TestServer::new(test_app(Arc::new(MemoryObjectStore::new()))).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_error() {
        let server = TestServer::new(test_app(Arc::new(MemoryObjectStore::new()))).unwrap();

        let response = server.get("/nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), serde_json::json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn test_wrong_method_returns_json_error() {
        let server = TestServer::new(test_app(Arc::new(MemoryObjectStore::new()))).unwrap();

        let response = server.get("/delete/mybucket/a.txt").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.json::<Value>(),
            serde_json::json!({ "error": "Method not allowed" })
        );
    }

    #[tokio::test]
    async fn test_request_id_is_generated_and_propagated() {
        let server = TestServer::new(test_app(Arc::new(MemoryObjectStore::new()))).unwrap();

        let response = server.get("/health").await;
        let generated = response.header("x-request-id");
        assert!(Uuid::parse_str(generated.to_str().unwrap()).is_ok());

        let response = server
            .get("/health")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("client-supplied-id"),
            )
            .await;
        assert_eq!(response.header("x-request-id"), "client-supplied-id");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_object_routes() {
        let server = TestServer::new(test_app(Arc::new(MemoryObjectStore::new()))).unwrap();

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let doc = response.json::<Value>();
        assert_eq!(doc["info"]["title"], "Bucket Gateway API");
        for path in [
            "/upload/{bucket}/{key}",
            "/list/{bucket}",
            "/download/{bucket}/{key}",
            "/delete/{bucket}/{key}",
        ] {
            assert!(doc["paths"].get(path).is_some(), "missing {}", path);
        }
    }
}
