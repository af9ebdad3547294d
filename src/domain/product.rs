//! The product entity and its persisted shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Table backing the product resource.
pub const PRODUCT_TABLE: &str = "product";

/// Maximum length of the `name` and `description` columns (`VARCHAR(255)`).
pub const TEXT_COLUMN_MAX_LEN: usize = 255;

/// Schema created at start-up when the table is missing.
pub const CREATE_PRODUCT_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS product (
    id INTEGER PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description VARCHAR(255),
    price DOUBLE PRECISION NOT NULL,
    quantity INTEGER NOT NULL
)";

/// A stocked product.
///
/// `id` is chosen by the caller and is unique across live rows. `quantity` has no floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeleteConfirmation {
    pub id: i32,
    pub deleted: bool,
}

impl DeleteConfirmation {
    pub fn new(id: i32) -> Self {
        Self { id, deleted: true }
    }
}

/// Rows written into an empty table at start-up.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "phone".to_string(),
            description: Some("samsung".to_string()),
            price: 54000.3,
            quantity: 15,
        },
        Product {
            id: 4,
            name: "Laptop".to_string(),
            description: Some("samsung".to_string()),
            price: 740000.0,
            quantity: 5,
        },
        Product {
            id: 3,
            name: "Charger".to_string(),
            description: Some("Mobile Charger".to_string()),
            price: 52.0,
            quantity: 32,
        },
    ]
}
