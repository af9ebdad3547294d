pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ProductService, ServiceError};
pub use domain::{DeleteConfirmation, Product};
pub use infra::Config;
pub use storage::{MemoryProductStore, PgProductStore, ProductStore};
