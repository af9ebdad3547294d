use crate::domain::{DeleteConfirmation, Product};
use crate::transport::http::error::ApiError;
use crate::transport::http::extract::ProductId;
use crate::transport::http::types::{AppState, ErrorBody};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products in id order", body = [Product]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.service.list_products().await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/products/id/{id}",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "No product with this id", body = ErrorBody),
        (status = 422, description = "Path id is not an integer", body = ErrorBody)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<Json<Product>, ApiError> {
    let product = state.service.get_product(id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id (authoritative over any id in the body)")
    ),
    request_body = Product,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 409, description = "A product with this id already exists", body = ErrorBody),
        (status = 422, description = "Invalid payload", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(payload) = payload?;
    let product = state.service.create_product(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id (authoritative over any id in the body)")
    ),
    request_body = Product,
    responses(
        (status = 200, description = "Product replaced", body = Product),
        (status = 404, description = "No product with this id", body = ErrorBody),
        (status = 422, description = "Invalid payload", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(payload) = payload?;
    let product = state.service.update_product(id, &payload).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/products/del_id/{id}",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted", body = DeleteConfirmation),
        (status = 404, description = "No product with this id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let confirmation = state.service.delete_product(id).await?;
    Ok(Json(confirmation))
}
