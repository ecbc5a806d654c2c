//! Strongly-typed identifiers for domain entities
//!
//! Products are keyed by an operator-assigned code and bills by a sequential
//! invoice number. Newtype wrappers prevent accidental mixing of the two and
//! centralize the validation rules for each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing or constructing identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Product code must not be empty")]
    EmptyProductCode,

    #[error("Invalid invoice number: {0}")]
    InvalidInvoiceNo(String),
}

/// Natural key of a product
///
/// Codes are operator-assigned (e.g. "F100"), trimmed of surrounding
/// whitespace and never empty. Comparison is exact; display ordering uses
/// [`crate::natural::natural_cmp`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductCode(String);

impl ProductCode {
    /// Creates a product code, trimming whitespace
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed code is empty
    pub fn new(code: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = code.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::EmptyProductCode);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProductCode {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductCode> for String {
    fn from(code: ProductCode) -> String {
        code.0
    }
}

impl FromStr for ProductCode {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Sequential invoice number assigned to bills
///
/// The first bill in an empty ledger is numbered [`InvoiceNo::FIRST`]; each
/// subsequent bill takes the highest existing number plus one. Numbers are
/// assigned at commit time and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNo(i64);

impl InvoiceNo {
    /// Invoice number of the first bill ever created
    pub const FIRST: InvoiceNo = InvoiceNo(100);

    /// Wraps a raw invoice number
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns the next number in the sequence
    pub fn succ(&self) -> InvoiceNo {
        InvoiceNo(self.0 + 1)
    }
}

impl fmt::Display for InvoiceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvoiceNo {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(InvoiceNo)
            .map_err(|_| IdentifierError::InvalidInvoiceNo(s.to_string()))
    }
}

impl From<i64> for InvoiceNo {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<InvoiceNo> for i64 {
    fn from(no: InvoiceNo) -> i64 {
        no.0
    }
}
