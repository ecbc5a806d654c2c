//! Core Kernel - Foundational types and utilities for the retail POS
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money type with precise decimal arithmetic
//! - Strongly-typed product and invoice identifiers
//! - Natural (numeric-aware) string ordering for display-stable sorts

pub mod money;
pub mod identifiers;
pub mod natural;
pub mod error;
pub mod ports;

pub use money::{Money, MoneyError};
pub use identifiers::{ProductCode, InvoiceNo, IdentifierError};
pub use natural::natural_cmp;
pub use error::CoreError;
pub use ports::PortError;
