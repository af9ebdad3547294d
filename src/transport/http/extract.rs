//! Custom Axum extractors

use crate::domain::{FieldErrorKind, ValidationErrors};
use crate::transport::http::error::ApiError;
use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

/// Product id taken from the single path parameter.
///
/// Non-integer ids are rejected as a validation error on `id` instead of axum's plain-text
/// path rejection.
pub struct ProductId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ApiError::Validation(ValidationErrors::single(
                    "id",
                    FieldErrorKind::Missing,
                    "path id required",
                ))
            })?;

        raw.trim().parse::<i32>().map(Self).map_err(|_| {
            ApiError::Validation(ValidationErrors::single(
                "id",
                FieldErrorKind::InvalidType,
                format!("path id {:?} is not a 32-bit integer", raw),
            ))
        })
    }
}
