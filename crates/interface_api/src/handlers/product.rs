//! Product handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use core_kernel::ProductCode;
use domain_inventory::InventoryStore;

use crate::dto::product::*;
use crate::{error::ApiError, AppState};

/// Creates a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    request.validate()?;
    let product = state
        .inventory
        .create_product(request.into_domain()?)
        .await?;
    Ok(Json(product.into()))
}

/// Lists the whole catalog
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.inventory.list_products().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Searches products by code or name substring
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.inventory.search_products(&query.q).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Gets a product by exact code
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let code = ProductCode::new(&code)?;
    let product = state.inventory.get_product(&code).await?;
    Ok(Json(product.into()))
}

/// Partially updates a product (name, prices, stock)
pub async fn update_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    request.validate()?;
    let code = ProductCode::new(&code)?;
    let product = state
        .inventory
        .update_product(&code, request.into_patch())
        .await?;
    Ok(Json(product.into()))
}

/// Deletes a product
///
/// Historical bills keep their snapshots; nothing cascades.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let code = ProductCode::new(&code)?;
    state.inventory.delete_product(&code).await?;
    Ok(Json(DeleteResponse { success: true }))
}
