//! Health handlers

use axum::{extract::State, Json};
use serde::Serialize;

use domain_inventory::InventoryStore;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness probe - verifies the catalog store answers
pub async fn readiness_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.inventory.list_products().await {
        Ok(_) => "ready",
        Err(err) => {
            tracing::warn!(%err, "readiness check failed");
            "degraded"
        }
    };
    Json(HealthResponse { status })
}
