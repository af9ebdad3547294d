//! API error type with automatic HTTP status mapping.
//!
//! Storage failures are logged and replaced by a generic message; driver text never reaches
//! the client.

use crate::app::ServiceError;
use crate::domain::{FieldErrorKind, ValidationErrors};
use crate::transport::http::types::ErrorBody;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug)]
pub enum ApiError {
    /// Payload or path id failed validation (422)
    Validation(ValidationErrors),

    /// No product with this id (404)
    NotFound { id: i32 },

    /// Create with an id that already exists (409)
    Conflict { id: i32 },

    /// Body rejected before it could be parsed: wrong content type, too large (status kept)
    Rejected { status: StatusCode, message: String },

    /// Storage unreachable (503, logged)
    Unavailable(String),

    /// Any other storage failure (500, logged)
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "validation_error".to_string(),
                    message: e.to_string(),
                    fields: Some(e.errors),
                    id: None,
                },
            ),
            Self::NotFound { id } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not_found".to_string(),
                    message: format!("product with id {} not found", id),
                    fields: None,
                    id: Some(id),
                },
            ),
            Self::Conflict { id } => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: "conflict".to_string(),
                    message: format!("product with id {} already exists", id),
                    fields: None,
                    id: Some(id),
                },
            ),
            Self::Rejected { status, message } => (
                status,
                ErrorBody {
                    error: "invalid_request".to_string(),
                    message,
                    fields: None,
                    id: None,
                },
            ),
            Self::Unavailable(detail) => {
                tracing::error!("Storage unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        error: "unavailable".to_string(),
                        message: "storage is unavailable".to_string(),
                        fields: None,
                        id: None,
                    },
                )
            }
            Self::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal_error".to_string(),
                        message: "an internal error occurred".to_string(),
                        fields: None,
                        id: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => Self::Validation(v),
            ServiceError::NotFound { id } => Self::NotFound { id },
            ServiceError::Conflict { id } => Self::Conflict { id },
            ServiceError::Persistence(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        match e {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                Self::Validation(ValidationErrors::single(
                    "body",
                    FieldErrorKind::InvalidType,
                    format!("invalid JSON body: {}", e.body_text()),
                ))
            }
            other => Self::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_422_with_fields() {
        let err = ApiError::Validation(ValidationErrors::single(
            "price",
            FieldErrorKind::Missing,
            "field required",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["fields"][0]["field"], "price");
        assert_eq!(body["fields"][0]["kind"], "missing");
    }

    #[tokio::test]
    async fn not_found_and_conflict_name_the_id() {
        let response = ApiError::from(ServiceError::NotFound { id: 9 }).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["id"], 9);

        let response = ApiError::from(ServiceError::Conflict { id: 3 }).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["id"], 3);
    }

    #[tokio::test]
    async fn rejected_body_keeps_its_status() {
        let err = ApiError::Rejected {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["error"], "invalid_request");
    }

    #[tokio::test]
    async fn persistence_error_is_opaque_500() {
        let err = ServiceError::Persistence(StoreError::Unavailable(
            "password authentication failed for user".to_string(),
        ));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "an internal error occurred");
        assert!(!body.to_string().contains("password"));
    }
}
