//! Inventory domain errors

use core_kernel::{Money, PortError, ProductCode};
use thiserror::Error;

/// Errors that can occur in the inventory domain
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A product with this code already exists
    #[error("Product {code} already exists")]
    DuplicateCode { code: ProductCode },

    /// Product not found
    #[error("Product {code} not found")]
    ProductNotFound { code: ProductCode },

    /// Stock count would be negative
    #[error("Invalid stock count: {stock}")]
    InvalidStock { stock: i64 },

    /// Negative price tier
    #[error("Invalid price: {price}")]
    InvalidPrice { price: Money },

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_code() {
        let err = InventoryError::ProductNotFound {
            code: ProductCode::new("F100").unwrap(),
        };
        assert_eq!(err.to_string(), "Product F100 not found");
    }
}
