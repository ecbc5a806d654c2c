//! Database Infrastructure Layer
//!
//! This crate provides PostgreSQL-backed implementations of the domain port
//! traits using SQLx:
//!
//! - [`PgInventoryStore`] implements `domain_inventory::InventoryStore`
//! - [`PgBillStore`] implements `domain_billing::BillStore`
//!
//! # Atomicity
//!
//! Every bill mutation runs inside a single transaction. Affected product
//! rows are locked `FOR UPDATE` in deterministic code order, the pure
//! reconciliation planner validates against that locked snapshot, and stock
//! is applied with conditional updates that refuse to go below zero. The
//! invoice sequence is serialized with a transaction-scoped advisory lock.
//!
//! Queries use the runtime SQLx API so the workspace builds without a live
//! database connection.

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::billing::PgBillStore;
pub use repositories::inventory::PgInventoryStore;

/// Embedded migrations; the server binary applies them at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
