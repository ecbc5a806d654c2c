//! Billing domain errors
//!
//! The taxonomy mirrors what the POS reports to the operator: which code
//! failed and why, so the caller can fix the offending line item.

use core_kernel::{InvoiceNo, MoneyError, PortError, ProductCode};
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Bill not found
    #[error("Bill {invoice_no} not found")]
    BillNotFound { invoice_no: InvoiceNo },

    /// A line item references a product that does not exist
    #[error("Product {code} not found")]
    ProductNotFound { code: ProductCode },

    /// A line item quantity is out of range
    #[error("Invalid quantity for {code}: {qty}")]
    InvalidQuantity { code: ProductCode, qty: i64 },

    /// Requested units exceed what is on hand
    #[error("Insufficient stock for {name} ({code}). Available: {available}")]
    InsufficientStock {
        code: ProductCode,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Decimal arithmetic failure while computing totals
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] MoneyError),

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}
