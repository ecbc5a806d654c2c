//! Inventory domain ports
//!
//! The `InventoryStore` trait defines all operations the inventory domain
//! needs from its data source. Two adapters implement it:
//!
//! - **PostgreSQL adapter** (infra_db): production storage
//! - **In-memory adapter** (test_utils): single-writer store for tests
//!
//! Stock mutations driven by billing do not appear here; they belong to the
//! bill store, whose implementations adjust stock and bill records inside
//! one atomic unit.

use async_trait::async_trait;

use core_kernel::ProductCode;

use crate::error::InventoryError;
use crate::product::{NewProduct, Product, ProductPatch};

/// Port for product catalog storage
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Creates a product
    ///
    /// # Errors
    ///
    /// - [`InventoryError::DuplicateCode`] if the code is taken
    async fn create_product(&self, new: NewProduct) -> Result<Product, InventoryError>;

    /// Fetches a product by exact code
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ProductNotFound`] if absent
    async fn get_product(&self, code: &ProductCode) -> Result<Product, InventoryError>;

    /// Lists the whole catalog in natural code order
    async fn list_products(&self) -> Result<Vec<Product>, InventoryError>;

    /// Searches by case-insensitive substring over code or name
    ///
    /// Returns at most [`crate::search::MAX_SEARCH_RESULTS`] products.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, InventoryError>;

    /// Applies a partial update to a product
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ProductNotFound`] if absent
    /// - [`InventoryError::InvalidStock`] / [`InventoryError::InvalidPrice`]
    ///   if the patch fails validation
    async fn update_product(
        &self,
        code: &ProductCode,
        patch: ProductPatch,
    ) -> Result<Product, InventoryError>;

    /// Deletes a product
    ///
    /// Existing bills keep their snapshots; deletion never cascades.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ProductNotFound`] if absent
    async fn delete_product(&self, code: &ProductCode) -> Result<(), InventoryError>;
}
