//! PostgreSQL-backed product store.

use crate::domain::product::{Product, CREATE_PRODUCT_TABLE_SQL, PRODUCT_TABLE};
use crate::storage::{ProductStore, StoreError, StoreResult, UnitOfWork};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

const SELECT_COLUMNS: &str = "id, name, description, price, quantity";

/// A product store that uses a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `product` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_PRODUCT_TABLE_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn table_exists(&self) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )",
        )
        .bind(PRODUCT_TABLE)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(connection_error)?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(connection_error)?;
        Ok(())
    }
}

/// One transaction on a pooled connection.
///
/// Dropping it without committing rolls the transaction back and returns the connection to
/// the pool.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

/// Failures to reach the server at all; everything else stays a database error.
fn connection_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Database(other),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn fetch_all(&mut self) -> StoreResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", SELECT_COLUMNS, PRODUCT_TABLE);
        let rows = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn fetch_by_id(&mut self, id: i32) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", SELECT_COLUMNS, PRODUCT_TABLE);
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn insert(&mut self, product: &Product) -> StoreResult<Product> {
        let sql = format!(
            "INSERT INTO {} (id, name, description, price, quantity) VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            PRODUCT_TABLE, SELECT_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Product>(&sql)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .fetch_one(&mut *self.tx)
            .await;

        match inserted {
            Ok(row) => Ok(row),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateKey { id: product.id }),
            Err(e) => Err(e.into()),
        }
    }

    async fn replace(&mut self, id: i32, product: &Product) -> StoreResult<Product> {
        let sql = format!(
            "UPDATE {} SET name = $2, description = $3, price = $4, quantity = $5
             WHERE id = $1 RETURNING {}",
            PRODUCT_TABLE, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    async fn delete(&mut self, id: i32) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", PRODUCT_TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&mut *self.tx).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }

    async fn count(&mut self) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", PRODUCT_TABLE);
        let n: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *self.tx).await?;
        Ok(n)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
