//! Error types for the inventory store.

use crate::types::ProductId;
use thiserror::Error;

/// Main error type for entity and repository operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or out-of-policy input. Raised before any state changes.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    /// The entity is left untouched when this is returned.
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("SKU '{sku}' is already in use by product {owner}")]
    Conflict { sku: String, owner: ProductId },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Inventory document is locked by another repository")]
    Locked,
}

impl InventoryError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        InventoryError::Validation(message.into())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(e: serde_json::Error) -> Self {
        InventoryError::Serialization(e.to_string())
    }
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
