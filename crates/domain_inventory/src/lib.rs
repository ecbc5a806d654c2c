//! Inventory Domain - Product Catalog and Stock
//!
//! This crate owns the product ledger: catalog records with wholesale and
//! retail price tiers and an on-hand stock count. Stock is only ever adjusted
//! through the billing reconciliation paths; this crate enforces the standing
//! invariant that a committed product never has negative stock.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_inventory::{NewProduct, Product};
//!
//! let rocket = NewProduct::new("F100", "Rocket", dec!(50), dec!(70), 20)?;
//! let product = store.create_product(rocket).await?;
//! assert_eq!(product.stock, 20);
//! ```

pub mod product;
pub mod search;
pub mod ports;
pub mod error;

pub use product::{Product, NewProduct, ProductPatch};
pub use search::{filter_catalog, matches_query, MAX_SEARCH_RESULTS};
pub use ports::InventoryStore;
pub use error::InventoryError;
