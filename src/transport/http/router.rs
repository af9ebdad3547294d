use crate::domain::{DeleteConfirmation, FieldError, FieldErrorKind, Product};
use crate::infra::config::CorsOrigins;
use crate::transport::http::handlers::{health, products};
use crate::transport::http::types::{AppState, ErrorBody, HealthResponse};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::greeting_handler,
        health::healthcheck_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler
    ),
    components(schemas(
        Product,
        DeleteConfirmation,
        ErrorBody,
        FieldError,
        FieldErrorKind,
        HealthResponse
    ))
)]
pub struct ApiDoc;

/// Product routes bound to `app_state`, without middleware.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::greeting_handler))
        .route("/health", get(health::healthcheck_handler))
        .route("/products", get(products::list_products_handler))
        .route("/products/id/:id", get(products::get_product_handler))
        .route(
            "/products/:id",
            post(products::create_product_handler).put(products::update_product_handler),
        )
        .route(
            "/products/del_id/:id",
            delete(products::delete_product_handler),
        )
        .with_state(app_state)
}

/// The full application: routes, Swagger UI, CORS and request tracing.
pub fn create_app(app_state: AppState, cors_origins: &CorsOrigins) -> Router {
    create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => layer.allow_origin(AllowOrigin::list(list.iter().cloned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_product_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/products",
            "/products/id/{id}",
            "/products/{id}",
            "/products/del_id/{id}",
            "/health",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
