//! Ports and adapters infrastructure
//!
//! Each domain defines a port trait describing what it needs from its data
//! source; adapters implement those traits against PostgreSQL (infra_db) or
//! in memory (test_utils). `PortError` is the unified failure type adapters
//! use for non-domain failures, keeping storage concerns out of the domain
//! error taxonomies.

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Domain-level outcomes (insufficient stock, missing product, and so on)
/// travel in
/// each domain's own error enum; `PortError` covers the infrastructure
/// failures underneath them.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error from a source error
    pub fn connection(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = PortError::not_found("Product", "F100");
        assert_eq!(err.to_string(), "Not found: Product with id F100");
    }

    #[test]
    fn test_conflict_message() {
        let err = PortError::conflict("duplicate code");
        assert!(err.to_string().contains("duplicate code"));
    }
}
