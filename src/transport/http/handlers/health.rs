use crate::transport::http::error::ApiError;
use crate::transport::http::types::{AppState, ErrorBody, HealthResponse};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (storage reachable)", body = HealthResponse),
        (status = 503, description = "Service is unhealthy (storage unreachable)", body = ErrorBody)
    )
)]
pub async fn healthcheck_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    state
        .service
        .health()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = String)
    )
)]
pub async fn greeting_handler() -> &'static str {
    concat!("inventory-api ", env!("CARGO_PKG_VERSION"))
}
