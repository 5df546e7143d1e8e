//! Product use cases on top of a repository.
//!
//! Looks products up by SKU, turns empty lookups into `NotFound`, and checks
//! SKU uniqueness before creating.
//!
//! Every command is a lookup followed by a save: two repository calls. The
//! service holds its own write lock across both, so concurrent commands
//! issued through one service never lose each other's updates and two
//! creates of the same SKU cannot both pass the uniqueness check. The lock
//! is per service instance; callers that write to the same repository
//! through something else are not covered.

use crate::error::{InventoryError, Result};
use crate::product::Product;
use crate::repository::ProductRepository;
use crate::types::{Category, Price, ProductId};
use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Orchestrates product operations over a repository.
pub struct ProductService<R> {
    repository: R,

    /// Held for each command's whole lookup/save cycle.
    write_lock: Mutex<()>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Create and store a new product, returning its id.
    pub fn create_product(
        &self,
        sku: &str,
        name: &str,
        price: Price,
        stock: i64,
        category: Category,
        expiry: Option<NaiveDate>,
    ) -> Result<ProductId> {
        let _lock = self.write_lock.lock();

        if let Some(existing) = self.repository.find_by_sku(sku)? {
            warn!(sku, owner = %existing.id(), "SKU already registered");
            return Err(InventoryError::Conflict {
                sku: sku.to_string(),
                owner: existing.id(),
            });
        }

        let product = Product::create(sku, name, price, stock, category, expiry)?;
        self.repository.save(&product)?;

        debug!(sku, id = %product.id(), "created product");
        Ok(product.id())
    }

    /// Remove `quantity` units from the product with this SKU.
    pub fn decrease_stock(&self, sku: &str, quantity: i64) -> Result<Product> {
        let _lock = self.write_lock.lock();

        let mut product = self.require(sku)?;
        product.decrease_stock(quantity)?;
        self.repository.save(&product)?;
        Ok(product)
    }

    /// Add `quantity` units to the product with this SKU.
    pub fn increase_stock(&self, sku: &str, quantity: i64) -> Result<Product> {
        let _lock = self.write_lock.lock();

        let mut product = self.require(sku)?;
        product.increase_stock(quantity)?;
        self.repository.save(&product)?;
        Ok(product)
    }

    pub fn list_products(&self) -> Result<Vec<Product>> {
        self.repository.list_all()
    }

    pub fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        self.repository.find_by_sku(sku)
    }

    /// Delete the product with this SKU.
    pub fn remove_product(&self, sku: &str) -> Result<()> {
        let _lock = self.write_lock.lock();

        let product = self.require(sku)?;
        self.repository.delete_by_id(product.id())?;
        Ok(())
    }

    fn require(&self, sku: &str) -> Result<Product> {
        self.repository
            .find_by_sku(sku)?
            .ok_or_else(|| InventoryError::NotFound(format!("no product with SKU '{}'", sku)))
    }
}
