//! PostgreSQL connection pool construction.

use crate::infra::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Builds the pool every unit of work draws its connection from.
///
/// The pool connects eagerly so a bad URL or unreachable server fails at start-up rather than
/// on the first request.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(config.connect_options.clone())
        .await
}
