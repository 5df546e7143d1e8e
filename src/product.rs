//! The product entity.
//!
//! A [`Product`] can only be obtained in two ways:
//!
//! - [`Product::create`], which validates every field and mints a fresh id.
//! - `Product::rehydrate`, crate-private, used by the document reader to
//!   rebuild products that were validated when they were first created.
//!
//! After construction the only mutations are [`Product::decrease_stock`] and
//! [`Product::increase_stock`]. Equality and hashing look at the id alone.

use crate::error::{InventoryError, Result};
use crate::types::{Category, Price, ProductId, MAX_NAME_LEN, MIN_NAME_LEN};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A product tracked by the inventory.
#[derive(Clone, Debug)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    price: Price,
    category: Category,
    expiry: Option<NaiveDate>,
    stock: i64,
}

impl Product {
    /// Validate the input and create a product with a new id.
    ///
    /// Expiry dates are checked against today's local calendar date.
    pub fn create(
        sku: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        stock: i64,
        category: Category,
        expiry: Option<NaiveDate>,
    ) -> Result<Self> {
        Self::create_on(
            Local::now().date_naive(),
            sku,
            name,
            price,
            stock,
            category,
            expiry,
        )
    }

    /// Same as [`Product::create`] with an explicit "today".
    pub(crate) fn create_on(
        today: NaiveDate,
        sku: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        stock: i64,
        category: Category,
        expiry: Option<NaiveDate>,
    ) -> Result<Self> {
        let sku = sku.into();
        let name = name.into();

        if sku.trim().is_empty() {
            return Err(InventoryError::validation("SKU is required."));
        }

        let name_len = name.chars().count();
        if name.trim().is_empty() || !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
            return Err(InventoryError::validation(format!(
                "Name must be between {} and {} characters.",
                MIN_NAME_LEN, MAX_NAME_LEN
            )));
        }

        if price.is_sign_negative() && !price.is_zero() {
            return Err(InventoryError::validation("Price cannot be negative."));
        }

        if stock < 0 {
            return Err(InventoryError::validation(
                "Initial stock cannot be negative.",
            ));
        }

        if let Some(date) = expiry {
            if date < today {
                return Err(InventoryError::validation(
                    "Expiry date cannot be in the past.",
                ));
            }
        }

        Ok(Self {
            id: ProductId::new(),
            sku,
            name,
            price,
            category,
            expiry,
            stock,
        })
    }

    /// Rebuild a product from trusted storage without re-validating.
    pub(crate) fn rehydrate(
        id: ProductId,
        sku: String,
        name: String,
        price: Price,
        category: Category,
        expiry: Option<NaiveDate>,
        stock: i64,
    ) -> Self {
        Self {
            id,
            sku,
            name,
            price,
            category,
            expiry,
            stock,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    /// Remove `quantity` units from stock.
    ///
    /// Fails with `Validation` for non-positive quantities and with
    /// `InsufficientStock` when more is requested than is on hand. Stock is
    /// unchanged on failure.
    pub fn decrease_stock(&mut self, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return Err(InventoryError::validation(
                "Quantity to remove must be positive.",
            ));
        }
        if quantity > self.stock {
            return Err(InventoryError::InsufficientStock {
                available: self.stock,
                requested: quantity,
            });
        }

        self.stock -= quantity;
        Ok(())
    }

    /// Add `quantity` units to stock.
    pub fn increase_stock(&mut self, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return Err(InventoryError::validation(
                "Quantity to add must be positive.",
            ));
        }

        self.stock = self
            .stock
            .checked_add(quantity)
            .ok_or_else(|| InventoryError::validation("Stock would overflow."))?;
        Ok(())
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product [Id={}, Sku={}, Name={}, Price={:.2}, Stock={}]",
            self.id, self.sku, self.name, self.price, self.stock
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn product(stock: i64) -> Product {
        Product::create_on(
            today(),
            "123",
            "Product",
            Decimal::new(10, 0),
            stock,
            Category::Grocery,
            None,
        )
        .unwrap()
    }

    fn validation_message(result: Result<Product>) -> String {
        match result {
            Err(InventoryError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_valid() {
        let expiry = NaiveDate::from_ymd_opt(2025, 7, 1);
        let p = Product::create_on(
            today(),
            "123",
            "Good Product",
            Decimal::new(1099, 2),
            10,
            Category::Dairy,
            expiry,
        )
        .unwrap();

        assert_eq!(p.sku(), "123");
        assert_eq!(p.name(), "Good Product");
        assert_eq!(p.price(), Decimal::new(1099, 2));
        assert_eq!(p.stock(), 10);
        assert_eq!(p.category(), Category::Dairy);
        assert_eq!(p.expiry(), expiry);
        assert!(!p.id().is_nil());
    }

    #[test]
    fn test_create_mints_distinct_ids() {
        assert_ne!(product(1).id(), product(1).id());
    }

    #[test]
    fn test_create_expiry_today_allowed() {
        let p = Product::create_on(
            today(),
            "123",
            "Milk",
            Decimal::ONE,
            1,
            Category::Dairy,
            Some(today()),
        );
        assert!(p.is_ok());
    }

    #[test]
    fn test_create_expiry_in_past() {
        let yesterday = today().pred_opt().unwrap();
        let msg = validation_message(Product::create_on(
            today(),
            "123",
            "Milk",
            Decimal::ONE,
            1,
            Category::Dairy,
            Some(yesterday),
        ));
        assert_eq!(msg, "Expiry date cannot be in the past.");
    }

    #[test]
    fn test_create_negative_price() {
        for price in [Decimal::new(-1, 0), Decimal::new(-1, 2)] {
            let msg = validation_message(Product::create_on(
                today(),
                "123",
                "Product",
                price,
                10,
                Category::Grocery,
                None,
            ));
            assert_eq!(msg, "Price cannot be negative.");
        }
    }

    #[test]
    fn test_create_zero_price_allowed() {
        let p = Product::create_on(
            today(),
            "123",
            "Freebie",
            Decimal::ZERO,
            0,
            Category::Grocery,
            None,
        );
        assert!(p.is_ok());
    }

    #[test]
    fn test_create_name_bounds() {
        let short = validation_message(Product::create_on(
            today(),
            "123",
            "Ab",
            Decimal::TEN,
            10,
            Category::Grocery,
            None,
        ));
        assert_eq!(short, "Name must be between 3 and 100 characters.");

        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            Product::create_on(today(), "123", long, Decimal::TEN, 10, Category::Grocery, None),
            Err(InventoryError::Validation(_))
        ));

        let exact = "x".repeat(MAX_NAME_LEN);
        assert!(
            Product::create_on(today(), "123", exact, Decimal::TEN, 10, Category::Grocery, None)
                .is_ok()
        );

        assert!(matches!(
            Product::create_on(today(), "123", "     ", Decimal::TEN, 10, Category::Grocery, None),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn test_create_name_counts_chars_not_bytes() {
        // Three characters, six bytes.
        let p = Product::create_on(today(), "123", "Pão", Decimal::TEN, 1, Category::Bakery, None);
        assert!(p.is_ok());
    }

    #[test]
    fn test_create_empty_sku() {
        for sku in ["", "   "] {
            let msg = validation_message(Product::create_on(
                today(),
                sku,
                "Product",
                Decimal::TEN,
                10,
                Category::Grocery,
                None,
            ));
            assert_eq!(msg, "SKU is required.");
        }
    }

    #[test]
    fn test_create_negative_stock() {
        let msg = validation_message(Product::create_on(
            today(),
            "123",
            "Product",
            Decimal::TEN,
            -1,
            Category::Grocery,
            None,
        ));
        assert_eq!(msg, "Initial stock cannot be negative.");
    }

    #[test]
    fn test_decrease_stock() {
        let mut p = product(10);
        p.decrease_stock(7).unwrap();
        assert_eq!(p.stock(), 3);
    }

    #[test]
    fn test_decrease_stock_insufficient() {
        let mut p = product(5);
        let result = p.decrease_stock(6);
        assert!(matches!(
            result,
            Err(InventoryError::InsufficientStock {
                available: 5,
                requested: 6
            })
        ));
        assert_eq!(p.stock(), 5);
    }

    #[test]
    fn test_decrease_stock_non_positive() {
        let mut p = product(10);
        assert!(matches!(
            p.decrease_stock(-2),
            Err(InventoryError::Validation(_))
        ));
        assert!(matches!(p.decrease_stock(0), Err(InventoryError::Validation(_))));
        assert_eq!(p.stock(), 10);
    }

    #[test]
    fn test_increase_stock() {
        let mut p = product(10);
        p.increase_stock(5).unwrap();
        assert_eq!(p.stock(), 15);
    }

    #[test]
    fn test_increase_stock_non_positive() {
        let mut p = product(10);
        assert!(matches!(
            p.increase_stock(-5),
            Err(InventoryError::Validation(_))
        ));
        assert_eq!(p.stock(), 10);
    }

    #[test]
    fn test_increase_stock_overflow() {
        let mut p = product(i64::MAX);
        assert!(matches!(p.increase_stock(1), Err(InventoryError::Validation(_))));
        assert_eq!(p.stock(), i64::MAX);
    }

    #[test]
    fn test_equality_by_id_only() {
        let original = product(10);
        let mut changed = original.clone();
        changed.decrease_stock(4).unwrap();

        assert_eq!(original, changed);

        let mut set = HashSet::new();
        set.insert(original.clone());
        assert!(set.contains(&changed));

        assert_ne!(original, product(10));
    }

    #[test]
    fn test_display() {
        let p = product(4);
        let text = p.to_string();
        assert!(text.starts_with("Product [Id="));
        assert!(text.contains("Sku=123"));
        assert!(text.contains("Price=10.00"));
        assert!(text.contains("Stock=4"));
    }

    proptest! {
        #[test]
        fn prop_decrease_within_stock(stock in 1i64..10_000, pick in 0.0f64..1.0) {
            let quantity = 1 + ((stock - 1) as f64 * pick) as i64;
            let mut p = product(stock);
            prop_assert!(p.decrease_stock(quantity).is_ok());
            prop_assert_eq!(p.stock(), stock - quantity);
        }

        #[test]
        fn prop_decrease_beyond_stock_leaves_stock(stock in 0i64..10_000, extra in 1i64..1_000) {
            let mut p = product(stock);
            let result = p.decrease_stock(stock + extra);
            let is_insufficient = matches!(result, Err(InventoryError::InsufficientStock { .. }));
            prop_assert!(is_insufficient);
            prop_assert_eq!(p.stock(), stock);
        }

        #[test]
        fn prop_non_positive_quantity_rejected(stock in 0i64..10_000, quantity in -10_000i64..=0) {
            let mut p = product(stock);
            let dec_is_validation = matches!(p.decrease_stock(quantity), Err(InventoryError::Validation(_)));
            let inc_is_validation = matches!(p.increase_stock(quantity), Err(InventoryError::Validation(_)));
            prop_assert!(dec_is_validation);
            prop_assert!(inc_is_validation);
            prop_assert_eq!(p.stock(), stock);
        }
    }
}
