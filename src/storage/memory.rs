//! In-process product store.
//!
//! Units of work are serialised: each one holds the table lock from `begin` until it is
//! committed, rolled back or dropped, and writes go to a staged copy that only replaces the
//! table on commit.

use crate::domain::Product;
use crate::storage::{ProductStore, StoreError, StoreResult, UnitOfWork};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Table = BTreeMap<i32, Product>;

#[derive(Clone, Default)]
pub struct MemoryProductStore {
    rows: Arc<Mutex<Table>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed rows in primary-key order.
    pub async fn snapshot(&self) -> Vec<Product> {
        self.rows.lock().await.values().cloned().collect()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.rows).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Table>,
    staged: Table,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn fetch_all(&mut self) -> StoreResult<Vec<Product>> {
        Ok(self.staged.values().cloned().collect())
    }

    async fn fetch_by_id(&mut self, id: i32) -> StoreResult<Option<Product>> {
        Ok(self.staged.get(&id).cloned())
    }

    async fn insert(&mut self, product: &Product) -> StoreResult<Product> {
        if self.staged.contains_key(&product.id) {
            return Err(StoreError::DuplicateKey { id: product.id });
        }
        self.staged.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn replace(&mut self, id: i32, product: &Product) -> StoreResult<Product> {
        let row = self
            .staged
            .get_mut(&id)
            .ok_or(StoreError::NotFound { id })?;
        *row = Product {
            id,
            ..product.clone()
        };
        Ok(row.clone())
    }

    async fn delete(&mut self, id: i32) -> StoreResult<()> {
        self.staged
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }

    async fn count(&mut self) -> StoreResult<i64> {
        Ok(self.staged.len() as i64)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
