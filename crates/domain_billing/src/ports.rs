//! Billing domain ports
//!
//! The `BillStore` trait defines every bill operation the domain exposes.
//! Implementations own the serialization discipline that makes the
//! validate-then-apply phases atomic:
//!
//! - **PostgreSQL adapter** (infra_db): one transaction per mutation with
//!   product rows locked in deterministic order and conditional decrements
//! - **In-memory adapter** (test_utils): a single-writer mutex over the
//!   whole ledger state
//!
//! Either way, concurrent mutations on the same product or the invoice
//! sequence serialize, and a bill's stock adjustments commit all-or-nothing.

use async_trait::async_trait;

use core_kernel::InvoiceNo;

use crate::bill::{Bill, BillUpdate, NewBill};
use crate::error::BillingError;

/// Port for bill storage and the reconciliation protocol
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Creates a bill, consuming stock and assigning the next invoice number
    ///
    /// Validation covers every line item before any stock is touched.
    ///
    /// # Errors
    ///
    /// - [`BillingError::ProductNotFound`] for an unknown code
    /// - [`BillingError::InvalidQuantity`] for a non-positive quantity
    /// - [`BillingError::InsufficientStock`] when stock cannot cover an item
    async fn create_bill(&self, new: NewBill) -> Result<Bill, BillingError>;

    /// Fetches a bill with items in natural code order
    ///
    /// # Errors
    ///
    /// - [`BillingError::BillNotFound`] if absent
    async fn get_bill(&self, invoice_no: InvoiceNo) -> Result<Bill, BillingError>;

    /// Lists all bills, newest invoice number first
    async fn list_bills(&self) -> Result<Vec<Bill>, BillingError>;

    /// Replaces a bill's contents, adjusting stock by the per-code delta
    ///
    /// The invoice number never changes. Validation runs across the union
    /// of old and new code sets before any delta applies.
    ///
    /// # Errors
    ///
    /// - [`BillingError::BillNotFound`] if absent
    /// - [`BillingError::InvalidQuantity`] for a negative quantity
    /// - [`BillingError::ProductNotFound`] for a positive delta on an
    ///   unknown code
    /// - [`BillingError::InsufficientStock`] when stock cannot cover a
    ///   positive delta
    async fn update_bill(
        &self,
        invoice_no: InvoiceNo,
        update: BillUpdate,
    ) -> Result<Bill, BillingError>;

    /// Deletes a bill, restoring stock for every line item
    ///
    /// # Errors
    ///
    /// - [`BillingError::BillNotFound`] if absent
    async fn delete_bill(&self, invoice_no: InvoiceNo) -> Result<(), BillingError>;
}
