//! On-disk document format.
//!
//! The whole inventory is one pretty-printed JSON object keyed by product id:
//!
//! ```text
//! {
//!   "6f1c...": {
//!     "id": "6f1c...",
//!     "sku": "123",
//!     "name": "Bread",
//!     "price": "4.50",
//!     "category": "Bakery",
//!     "expiry": "2025-07-01",
//!     "stock": 10
//!   }
//! }
//! ```
//!
//! `expiry` is omitted when the product has none. Categories are written by
//! name, never by ordinal.

use crate::error::{InventoryError, Result};
use crate::product::Product;
use crate::types::{Category, Price, ProductId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory form of the document.
pub(crate) type Snapshot = BTreeMap<ProductId, Product>;

/// Serialized form of a single product.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ProductRecord {
    id: ProductId,
    sku: String,
    name: String,
    price: Price,
    category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<NaiveDate>,
    stock: i64,
}

impl ProductRecord {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id(),
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            price: product.price(),
            category: product.category(),
            expiry: product.expiry(),
            stock: product.stock(),
        }
    }

    fn into_product(self) -> Product {
        Product::rehydrate(
            self.id,
            self.sku,
            self.name,
            self.price,
            self.category,
            self.expiry,
            self.stock,
        )
    }
}

/// Parse a document. Blank input is an empty inventory.
pub(crate) fn decode(text: &str) -> Result<Snapshot> {
    if text.trim().is_empty() {
        return Ok(Snapshot::new());
    }

    let records: BTreeMap<ProductId, ProductRecord> = serde_json::from_str(text)
        .map_err(|e| InventoryError::Deserialization(e.to_string()))?;

    Ok(records
        .into_values()
        .map(ProductRecord::into_product)
        .map(|p| (p.id(), p))
        .collect())
}

/// Render a snapshot as a pretty-printed document.
pub(crate) fn encode(snapshot: &Snapshot) -> Result<String> {
    let records: BTreeMap<ProductId, ProductRecord> = snapshot
        .iter()
        .map(|(id, p)| (*id, ProductRecord::from_product(p)))
        .collect();

    Ok(serde_json::to_string_pretty(&records)?)
}
