//! API error handling
//!
//! Maps the domain error taxonomy onto HTTP status codes:
//!
//! - direct lookups that miss → 404
//! - bill-payload validation failures (unknown product, bad quantity,
//!   insufficient stock) → 400 with the offending code in the message
//! - duplicate product code → 409
//! - malformed or invalid request bodies → 422
//! - storage failures → 500, as a generic failure distinct from the
//!   domain taxonomy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_billing::BillingError;
use domain_inventory::InventoryError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
            ApiError::Database(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg.clone())
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match &err {
            InventoryError::ProductNotFound { .. } => ApiError::NotFound(err.to_string()),
            InventoryError::DuplicateCode { .. } => ApiError::Conflict(err.to_string()),
            InventoryError::InvalidStock { .. } | InventoryError::InvalidPrice { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            InventoryError::Storage(inner) => {
                tracing::error!(error = %inner, "inventory storage failure");
                ApiError::Database("storage failure".to_string())
            }
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match &err {
            BillingError::BillNotFound { .. } => ApiError::NotFound(err.to_string()),
            // Bill-payload validation failures carry the offending code and
            // quantity back to the operator
            BillingError::ProductNotFound { .. }
            | BillingError::InvalidQuantity { .. }
            | BillingError::InsufficientStock { .. }
            | BillingError::Arithmetic(_) => ApiError::BadRequest(err.to_string()),
            BillingError::Storage(inner) => {
                tracing::error!(error = %inner, "billing storage failure");
                ApiError::Database("storage failure".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<core_kernel::IdentifierError> for ApiError {
    fn from(err: core_kernel::IdentifierError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ProductCode;

    #[test]
    fn test_insufficient_stock_is_bad_request() {
        let err = BillingError::InsufficientStock {
            code: ProductCode::new("F100").unwrap(),
            name: "Rocket".to_string(),
            available: 3,
            requested: 5,
        };
        assert!(matches!(ApiError::from(err), ApiError::BadRequest(_)));
    }

    #[test]
    fn test_duplicate_code_is_conflict() {
        let err = InventoryError::DuplicateCode {
            code: ProductCode::new("F100").unwrap(),
        };
        assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
    }

    #[test]
    fn test_storage_failure_is_generic() {
        let err = InventoryError::Storage(core_kernel::PortError::internal("boom"));
        match ApiError::from(err) {
            ApiError::Database(msg) => assert!(!msg.contains("boom")),
            other => panic!("expected Database, got {other:?}"),
        }
    }
}
