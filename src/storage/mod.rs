//! Storage seam for products.
//!
//! A [`ProductStore`] hands out one [`UnitOfWork`] per request. The unit of work owns an open
//! transaction; `commit` and `rollback` consume it, and dropping it without either discards
//! every write made through it.

use crate::domain::Product;
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod pool;
pub mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product {id} already exists")]
    DuplicateKey { id: i32 },

    #[error("product {id} not found")]
    NotFound { id: i32 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Opens a new unit of work with its own connection and transaction.
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;

    /// Checks that the backing storage is reachable.
    async fn ping(&self) -> StoreResult<()>;
}

/// Record-level operations inside one open transaction.
#[async_trait]
pub trait UnitOfWork: Send {
    /// All products in primary-key order.
    async fn fetch_all(&mut self) -> StoreResult<Vec<Product>>;

    async fn fetch_by_id(&mut self, id: i32) -> StoreResult<Option<Product>>;

    /// Fails with [`StoreError::DuplicateKey`] when a row with the same id exists.
    async fn insert(&mut self, product: &Product) -> StoreResult<Product>;

    /// Fails with [`StoreError::NotFound`] when no row has `id`.
    async fn replace(&mut self, id: i32, product: &Product) -> StoreResult<Product>;

    /// Fails with [`StoreError::NotFound`] when no row has `id`.
    async fn delete(&mut self, id: i32) -> StoreResult<()>;

    async fn count(&mut self) -> StoreResult<i64>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
