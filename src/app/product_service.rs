//! The product CRUD service.
//!
//! Every operation is one unit of work: validation first, then a single transaction that
//! ends committed or rolled back before the call returns. Duplicate ids and missing rows are
//! recovered into typed errors; anything else from storage is a [`ServiceError::Persistence`].

use crate::domain::{
    sample_products, validate_product, DeleteConfirmation, Product, ValidationErrors,
};
use crate::storage::{ProductStore, StoreError, StoreResult, UnitOfWork};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("product {id} not found")]
    NotFound { id: i32 },

    #[error("product {id} already exists")]
    Conflict { id: i32 },

    #[error("persistence failure: {0}")]
    Persistence(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey { id } => Self::Conflict { id },
            StoreError::NotFound { id } => Self::NotFound { id },
            other => Self::Persistence(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        let mut uow = self.store.begin().await?;
        let outcome = uow.fetch_all().await;
        finish(uow, outcome).await
    }

    pub async fn get_product(&self, id: i32) -> ServiceResult<Product> {
        let mut uow = self.store.begin().await?;
        let outcome = match uow.fetch_by_id(id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(StoreError::NotFound { id }),
            Err(e) => Err(e),
        };
        finish(uow, outcome).await
    }

    pub async fn create_product(&self, id: i32, payload: &JsonValue) -> ServiceResult<Product> {
        let product = validate_product(id, payload)?;

        let mut uow = self.store.begin().await?;
        let outcome = uow.insert(&product).await;
        let created = finish(uow, outcome).await?;
        info!(id = created.id, name = %created.name, "product created");
        Ok(created)
    }

    /// Full replacement: every field of the stored row is overwritten by the payload.
    pub async fn update_product(&self, id: i32, payload: &JsonValue) -> ServiceResult<Product> {
        let product = validate_product(id, payload)?;

        let mut uow = self.store.begin().await?;
        let outcome = uow.replace(id, &product).await;
        let updated = finish(uow, outcome).await?;
        info!(id, name = %updated.name, "product updated");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i32) -> ServiceResult<DeleteConfirmation> {
        let mut uow = self.store.begin().await?;
        let outcome = uow.delete(id).await;
        finish(uow, outcome).await?;
        info!(id, "product deleted");
        Ok(DeleteConfirmation::new(id))
    }

    /// Writes the sample catalogue when the table is empty. Returns the number of rows written.
    pub async fn seed_sample_products(&self) -> ServiceResult<usize> {
        let mut uow = self.store.begin().await?;
        let outcome = seed_into(uow.as_mut()).await;
        let written = finish(uow, outcome).await?;
        if written > 0 {
            info!(written, "seeded sample products");
        }
        Ok(written)
    }

    pub async fn health(&self) -> ServiceResult<()> {
        self.store.ping().await.map_err(ServiceError::Persistence)
    }
}

async fn seed_into(uow: &mut dyn UnitOfWork) -> StoreResult<usize> {
    let existing = uow.count().await?;
    if existing > 0 {
        info!(existing, "products already present, skipping seed");
        return Ok(0);
    }

    let samples = sample_products();
    for product in &samples {
        uow.insert(product).await?;
    }
    Ok(samples.len())
}

/// Commits on success, rolls back on failure. Consumes the unit of work either way.
async fn finish<T>(uow: Box<dyn UnitOfWork>, outcome: StoreResult<T>) -> ServiceResult<T> {
    match outcome {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            match &err {
                StoreError::NotFound { id } => debug!(id, "product not found"),
                StoreError::DuplicateKey { id } => warn!(id, "duplicate product id"),
                other => error!(error = %other, "storage operation failed"),
            }
            Err(err.into())
        }
    }
}
