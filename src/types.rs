//! Core value types for the inventory store.

use crate::error::InventoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Sale price. Fixed-point decimal, never a float.
pub type Price = rust_decimal::Decimal;

/// Shortest accepted product name, in characters.
pub const MIN_NAME_LEN: usize = 3;

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Unique identifier for a product.
///
/// Minted once when a product is created and never changed afterwards.
/// Only [`ProductId::new`] and parsing (including deserialization) produce
/// one; the wrapped UUID is not reachable from outside the crate:
///
/// ```compile_fail
/// let id = stockroom::ProductId(uuid::Uuid::nil());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Mint a fresh random identifier.
    pub fn new() -> Self {
        ProductId(Uuid::new_v4())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({})", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ProductId)
    }
}

/// Product category.
///
/// Persisted by symbolic name, so reordering variants never changes what a
/// stored document means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Dairy,
    Produce,
    Bakery,
    Grocery,
    Butcher,
    Beverages,
    Cleaning,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Dairy,
        Category::Produce,
        Category::Bakery,
        Category::Grocery,
        Category::Butcher,
        Category::Beverages,
        Category::Cleaning,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::Produce => "Produce",
            Category::Bakery => "Bakery",
            Category::Grocery => "Grocery",
            Category::Butcher => "Butcher",
            Category::Beverages => "Beverages",
            Category::Cleaning => "Cleaning",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InventoryError::Validation(format!("Unknown category: {}", wanted)))
    }
}
