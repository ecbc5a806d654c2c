//! Product catalog records
//!
//! A product carries two price tiers (wholesale `price` and `retail_price`)
//! and an integer stock count. Bills snapshot name and price at billing time,
//! so later edits here never rewrite history.

use serde::{Deserialize, Serialize};

use core_kernel::{Money, ProductCode};

use crate::error::InventoryError;

/// An inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Operator-assigned natural key
    pub code: ProductCode,
    /// Display name
    pub name: String,
    /// Wholesale unit price
    pub price: Money,
    /// Retail unit price
    pub retail_price: Money,
    /// Units on hand; never negative after a committed operation
    pub stock: i64,
}

/// Input for creating a product
///
/// All fields are required; validation happens on construction so a
/// `NewProduct` that exists is always safe to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: ProductCode,
    pub name: String,
    pub price: Money,
    pub retail_price: Money,
    pub stock: i64,
}

impl NewProduct {
    /// Creates a validated product input
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidStock`] if `stock` is negative
    /// - [`InventoryError::InvalidPrice`] if either price tier is negative
    pub fn new(
        code: ProductCode,
        name: impl Into<String>,
        price: Money,
        retail_price: Money,
        stock: i64,
    ) -> Result<Self, InventoryError> {
        if stock < 0 {
            return Err(InventoryError::InvalidStock { stock });
        }
        if price.is_negative() {
            return Err(InventoryError::InvalidPrice { price });
        }
        if retail_price.is_negative() {
            return Err(InventoryError::InvalidPrice {
                price: retail_price,
            });
        }
        Ok(Self {
            code,
            name: name.into(),
            price,
            retail_price,
            stock,
        })
    }

    /// Converts the input into a catalog record
    pub fn into_product(self) -> Product {
        Product {
            code: self.code,
            name: self.name,
            price: self.price,
            retail_price: self.retail_price,
            stock: self.stock,
        }
    }
}

/// Partial update of a product
///
/// Every field is optional; absent fields are left untouched. The patch is
/// an explicit struct rather than a raw JSON merge so unknown or unintended
/// fields can never reach the stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub retail_price: Option<Money>,
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Returns true if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.retail_price.is_none()
            && self.stock.is_none()
    }

    /// Applies the patch to a product
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidStock`] if the patched stock is negative
    /// - [`InventoryError::InvalidPrice`] if a patched price is negative
    pub fn apply(&self, product: &mut Product) -> Result<(), InventoryError> {
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(InventoryError::InvalidStock { stock });
            }
        }
        if let Some(price) = self.price {
            if price.is_negative() {
                return Err(InventoryError::InvalidPrice { price });
            }
        }
        if let Some(retail_price) = self.retail_price {
            if retail_price.is_negative() {
                return Err(InventoryError::InvalidPrice {
                    price: retail_price,
                });
            }
        }

        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(retail_price) = self.retail_price {
            product.retail_price = retail_price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    #[test]
    fn test_new_product_rejects_negative_stock() {
        let result = NewProduct::new(
            code("F100"),
            "Rocket",
            Money::new(dec!(50)),
            Money::new(dec!(70)),
            -1,
        );
        assert!(matches!(
            result,
            Err(InventoryError::InvalidStock { stock: -1 })
        ));
    }

    #[test]
    fn test_new_product_rejects_negative_price() {
        let result = NewProduct::new(
            code("F100"),
            "Rocket",
            Money::new(dec!(-1)),
            Money::new(dec!(70)),
            5,
        );
        assert!(matches!(result, Err(InventoryError::InvalidPrice { .. })));
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut product = NewProduct::new(
            code("F100"),
            "Rocket",
            Money::new(dec!(50)),
            Money::new(dec!(70)),
            20,
        )
        .unwrap()
        .into_product();

        let patch = ProductPatch {
            retail_price: Some(Money::new(dec!(75))),
            ..Default::default()
        };
        patch.apply(&mut product).unwrap();

        assert_eq!(product.retail_price, Money::new(dec!(75)));
        assert_eq!(product.price, Money::new(dec!(50)));
        assert_eq!(product.name, "Rocket");
        assert_eq!(product.stock, 20);
    }

    #[test]
    fn test_patch_rejects_negative_stock_without_mutating() {
        let mut product = NewProduct::new(
            code("F100"),
            "Rocket",
            Money::new(dec!(50)),
            Money::new(dec!(70)),
            20,
        )
        .unwrap()
        .into_product();

        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            stock: Some(-5),
            ..Default::default()
        };
        let result = patch.apply(&mut product);

        assert!(matches!(
            result,
            Err(InventoryError::InvalidStock { stock: -5 })
        ));
        // Validation happens before any field is written
        assert_eq!(product.name, "Rocket");
    }

    #[test]
    fn test_empty_patch() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            stock: Some(3),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
