//! Concurrent in-memory repository.
//!
//! Two sharded maps: id -> product, and a SKU -> id index. There is no
//! store-wide lock. Each map is safe for concurrent access on its own, and a
//! save claims its SKU through the index entry, so SKU uniqueness holds even
//! when two callers race. A reader running alongside a `save` may still see
//! the product map updated slightly before the index, or the other way round.

use super::ProductRepository;
use crate::error::{InventoryError, Result};
use crate::product::Product;
use crate::types::ProductId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::warn;

/// Non-durable repository that enforces SKU uniqueness on save.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: DashMap<ProductId, Product>,
    sku_index: DashMap<String, ProductId>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn save(&self, product: &Product) -> Result<()> {
        let id = product.id();

        // The index entry keeps the SKU's shard locked until the product map
        // has been updated.
        let previous = match self.sku_index.entry(product.sku().to_string()) {
            Entry::Occupied(entry) if *entry.get() != id => {
                let owner = *entry.get();
                warn!(sku = product.sku(), %owner, "rejected duplicate SKU");
                return Err(InventoryError::Conflict {
                    sku: product.sku().to_string(),
                    owner,
                });
            }
            Entry::Occupied(_) => self.products.insert(id, product.clone()),
            Entry::Vacant(entry) => {
                let previous = self.products.insert(id, product.clone());
                entry.insert(id);
                previous
            }
        };

        // Same id stored under another SKU before: drop the stale index entry.
        if let Some(old) = previous {
            if old.sku() != product.sku() {
                self.sku_index.remove_if(old.sku(), |_, owner| *owner == id);
            }
        }

        Ok(())
    }

    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.products.get(&id).map(|p| p.value().clone()))
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        let id = match self.sku_index.get(sku) {
            Some(id) => *id,
            None => return Ok(None),
        };
        self.find_by_id(id)
    }

    fn list_all(&self) -> Result<Vec<Product>> {
        Ok(self.products.iter().map(|p| p.value().clone()).collect())
    }

    fn delete_by_id(&self, id: ProductId) -> Result<bool> {
        match self.products.remove(&id) {
            Some((_, removed)) => {
                // Use the stored SKU, not anything the caller passed in.
                self.sku_index.remove_if(removed.sku(), |_, owner| *owner == id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
