//! Product persistence.
//!
//! [`ProductRepository`] is the capability set every backend provides. All
//! methods take `&self` and must be safe to call from many threads at once
//! without outside synchronization.

mod document;
mod file;
mod memory;

pub use file::{FileProductRepository, FileRepositoryConfig};
pub use memory::InMemoryProductRepository;

use crate::error::Result;
use crate::product::Product;
use crate::types::ProductId;
use std::sync::Arc;

/// Storage backend for products.
pub trait ProductRepository: Send + Sync {
    /// Insert the product, or overwrite the one stored under the same id.
    fn save(&self, product: &Product) -> Result<()>;

    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>>;

    fn list_all(&self) -> Result<Vec<Product>>;

    /// Remove the product with this id. Returns `false` when nothing was
    /// stored under it, which is not an error.
    fn delete_by_id(&self, id: ProductId) -> Result<bool>;
}

impl<R: ProductRepository + ?Sized> ProductRepository for Arc<R> {
    fn save(&self, product: &Product) -> Result<()> {
        (**self).save(product)
    }

    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        (**self).find_by_id(id)
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        (**self).find_by_sku(sku)
    }

    fn list_all(&self) -> Result<Vec<Product>> {
        (**self).list_all()
    }

    fn delete_by_id(&self, id: ProductId) -> Result<bool> {
        (**self).delete_by_id(id)
    }
}
