//! # Stockroom
//!
//! A small inventory store: products with a SKU, name, price, category,
//! optional expiry date and stock level, persisted behind a repository.
//!
//! ## Core Concepts
//!
//! - **Product**: validated on creation; only stock changes afterwards
//! - **Repository**: `save`/`find_by_id`/`find_by_sku`/`list_all`/`delete_by_id`,
//!   callable concurrently from many threads
//! - **File backend**: one pretty-printed JSON document, rewritten in full
//!   under a store-wide lock on every mutation
//! - **In-memory backend**: sharded concurrent maps with a unique SKU index
//! - **Service**: SKU-based use cases (create, remove stock, add stock)
//!
//! ## Example
//!
//! ```ignore
//! use stockroom::{Category, FileProductRepository, FileRepositoryConfig, ProductService};
//! use rust_decimal::Decimal;
//!
//! let repo = FileProductRepository::open(FileRepositoryConfig::at("./inventory.db.json"))?;
//! let service = ProductService::new(repo);
//!
//! let id = service.create_product("123", "Bread", Decimal::new(450, 2), 10, Category::Bakery, None)?;
//! let product = service.decrease_stock("123", 7)?;
//! assert_eq!(product.stock(), 3);
//! ```

pub mod cli;
pub mod error;
pub mod product;
pub mod repository;
pub mod service;
pub mod types;

// Re-exports
pub use error::{InventoryError, Result};
pub use product::Product;
pub use repository::{
    FileProductRepository, FileRepositoryConfig, InMemoryProductRepository, ProductRepository,
};
pub use service::ProductService;
pub use types::*;
