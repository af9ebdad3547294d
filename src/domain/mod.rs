//! Domain types for the product resource.

pub mod product;
pub mod validation;

pub use product::{sample_products, DeleteConfirmation, Product};
pub use validation::{validate_product, FieldError, FieldErrorKind, ValidationErrors};
