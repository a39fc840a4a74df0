use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::AppError;
use crate::shared::constants::NO_FILE_PART_MESSAGE;

/// Path extractor that reports bad parameters with the JSON error shape
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::BadRequest(format!(
                "Invalid path parameters: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Multipart extractor for uploads.
///
/// A body that is not multipart at all cannot contain a file part, so the
/// rejection is reported the same way as a form without one.
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => Ok(Self(multipart)),
            Err(rejection) => {
                debug!("Rejected upload body: {}", rejection.body_text());
                Err(AppError::BadRequest(NO_FILE_PART_MESSAGE.to_string()))
            }
        }
    }
}
