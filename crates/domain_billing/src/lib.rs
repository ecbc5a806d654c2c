//! Billing Domain - Bills and Stock Reconciliation
//!
//! This crate implements the invoice ledger and the reconciliation protocol
//! that keeps product stock consistent with bill line items as bills are
//! created, edited, and deleted.
//!
//! # Reconciliation principles
//!
//! Every bill mutation follows the same two-phase shape:
//!
//! - **Validate everything**: each affected product is checked (existence,
//!   quantity, sufficient stock) against a snapshot taken under the store's
//!   serialization discipline, before anything is written.
//! - **Apply everything**: only when the whole plan validates are stock
//!   deltas applied and the bill persisted, in one atomic unit.
//!
//! A partial failure therefore never leaves inventory half-adjusted.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{NewBill, NewLineItem, reconciliation};
//!
//! let plan = reconciliation::plan_creation(&new_bill.items, &snapshot)?;
//! // ...apply plan and persist the bill atomically...
//! ```

pub mod bill;
pub mod numbering;
pub mod reconciliation;
pub mod classify;
pub mod ports;
pub mod error;

pub use bill::{Bill, LineItem, NewBill, NewLineItem, BillUpdate};
pub use numbering::next_invoice_no;
pub use reconciliation::{
    plan_creation, plan_reversal, plan_update, ReconciliationPlan, StockDelta, StockEntry,
    StockSnapshot,
};
pub use classify::{classify, BillClass};
pub use ports::BillStore;
pub use error::BillingError;
