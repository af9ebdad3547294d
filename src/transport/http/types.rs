use crate::app::ProductService;
use crate::domain::FieldError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProductService>,
}

impl AppState {
    pub fn new(service: ProductService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Error body returned by every failing request.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable code: `validation_error`, `not_found`, `conflict`,
    /// `unavailable` or `internal_error`.
    pub error: String,
    pub message: String,
    /// Failing fields (validation errors only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
    /// Offending product id (not found / conflict only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
