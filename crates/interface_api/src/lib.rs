//! HTTP API Layer
//!
//! This crate provides the REST API for the retail POS using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for products and bills
//! - **DTOs**: Request/Response data transfer objects with validation
//! - **Error Handling**: Consistent error responses mapping the domain
//!   taxonomy onto HTTP status codes
//!
//! Handlers talk to the domain through the port traits, so the same router
//! runs against PostgreSQL in production and the in-memory store in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_billing::BillStore;
use domain_inventory::InventoryStore;
use infra_notify::Notifier;

use crate::config::ApiConfig;
use crate::handlers::{bill, health, product};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn InventoryStore>,
    pub bills: Arc<dyn BillStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state (stores, notifier, config)
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no API prefix)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Product routes
    let product_routes = Router::new()
        .route("/", post(product::create_product))
        .route("/", get(product::list_products))
        .route("/search", get(product::search_products))
        .route("/:code", get(product::get_product))
        .route("/:code", put(product::update_product))
        .route("/:code", delete(product::delete_product));

    // Bill routes
    let bill_routes = Router::new()
        .route("/", post(bill::create_bill))
        .route("/", get(bill::list_bills))
        .route("/:invoice_no", get(bill::get_bill))
        .route("/:invoice_no", put(bill::update_bill))
        .route("/:invoice_no", delete(bill::delete_bill))
        .route("/:invoice_no/classify", get(bill::classify_bill));

    let api_routes = Router::new()
        .nest("/products", product_routes)
        .nest("/bills", bill_routes);

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
