//! Bill handlers
//!
//! The mutation handlers delegate the reconciliation protocol to the bill
//! store; what lives here is wire conversion and the fire-and-forget
//! notification side effect on successful creation.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use core_kernel::{InvoiceNo, Money, ProductCode};
use domain_billing::{classify, BillStore};
use domain_inventory::{InventoryError, InventoryStore};
use infra_notify::spawn_thank_you;

use crate::dto::bill::*;
use crate::dto::product::DeleteResponse;
use crate::{error::ApiError, AppState};

/// Creates a bill, consuming stock
///
/// On success, thank-you notifications go out on detached tasks; their
/// outcome never affects the response.
pub async fn create_bill(
    State(state): State<AppState>,
    Json(request): Json<CreateBillRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    request.validate()?;
    let bill = state.bills.create_bill(request.into_domain()?).await?;

    spawn_thank_you(
        state.notifier.clone(),
        bill.clone(),
        state.config.firm_name.clone(),
        state.config.public_base_url.clone(),
    );

    Ok(Json(bill.into()))
}

/// Lists all bills, newest first
pub async fn list_bills(
    State(state): State<AppState>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let bills = state.bills.list_bills().await?;
    Ok(Json(bills.into_iter().map(Into::into).collect()))
}

/// Gets a bill by invoice number
pub async fn get_bill(
    State(state): State<AppState>,
    Path(invoice_no): Path<i64>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = state.bills.get_bill(InvoiceNo::new(invoice_no)).await?;
    Ok(Json(bill.into()))
}

/// Replaces a bill's contents, adjusting stock by the delta
pub async fn update_bill(
    State(state): State<AppState>,
    Path(invoice_no): Path<i64>,
    Json(request): Json<UpdateBillRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    request.validate()?;
    let bill = state
        .bills
        .update_bill(InvoiceNo::new(invoice_no), request.into_domain()?)
        .await?;
    Ok(Json(bill.into()))
}

/// Deletes a bill, restoring stock for every line item
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(invoice_no): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.bills.delete_bill(InvoiceNo::new(invoice_no)).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Classifies a bill as retail or wholesale for edit routing
pub async fn classify_bill(
    State(state): State<AppState>,
    Path(invoice_no): Path<i64>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let bill = state.bills.get_bill(InvoiceNo::new(invoice_no)).await?;

    // Current retail prices for the referenced products; vanished products
    // stay out of the map and classify as a mismatch
    let mut retail_prices: HashMap<ProductCode, Money> = HashMap::new();
    for item in &bill.items {
        if retail_prices.contains_key(&item.code) {
            continue;
        }
        match state.inventory.get_product(&item.code).await {
            Ok(product) => {
                retail_prices.insert(item.code.clone(), product.retail_price);
            }
            Err(InventoryError::ProductNotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }

    Ok(Json(ClassifyResponse {
        kind: classify(&bill, &retail_prices),
    }))
}
