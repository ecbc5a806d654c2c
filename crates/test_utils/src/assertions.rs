//! Custom assertion helpers for domain types

use core_kernel::ProductCode;
use domain_inventory::InventoryStore;

/// Asserts a product's current stock level
///
/// # Panics
///
/// Panics if the product is missing or the stock differs.
pub async fn expect_stock<S: InventoryStore + ?Sized>(store: &S, code: &str, expected: i64) {
    let code = ProductCode::new(code).expect("assertion code must be valid");
    let product = store
        .get_product(&code)
        .await
        .unwrap_or_else(|e| panic!("expected product {code} to exist: {e}"));
    assert_eq!(
        product.stock, expected,
        "stock mismatch for {code}: expected {expected}, found {}",
        product.stock
    );
}
