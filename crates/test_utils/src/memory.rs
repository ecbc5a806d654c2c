//! In-memory store
//!
//! Implements both domain ports over plain maps guarded by a single async
//! mutex. Every mutation runs while holding the lock, which is the
//! single-writer serialization discipline: the validate-then-apply phases
//! of a reconciliation are atomic because nothing else can interleave.
//!
//! Shares all reconciliation logic with the PostgreSQL adapter through the
//! pure planners, so behavior observed here matches production storage.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use core_kernel::{natural_cmp, InvoiceNo, ProductCode};
use domain_billing::{
    bill::{compose_items, grand_total},
    next_invoice_no, plan_creation, plan_reversal, plan_update, Bill, BillStore, BillUpdate,
    BillingError, NewBill, ReconciliationPlan, StockSnapshot,
};
use domain_inventory::{
    filter_catalog, InventoryError, InventoryStore, NewProduct, Product, ProductPatch,
};

#[derive(Debug, Default)]
struct MemoryState {
    products: HashMap<ProductCode, Product>,
    bills: BTreeMap<i64, Bill>,
}

impl MemoryState {
    /// Snapshots name and stock for the requested codes
    fn snapshot(&self, codes: impl IntoIterator<Item = ProductCode>) -> StockSnapshot {
        let mut snapshot = StockSnapshot::new();
        for code in codes {
            if let Some(product) = self.products.get(&code) {
                snapshot.insert(code, product.name.clone(), product.stock);
            }
        }
        snapshot
    }

    /// Applies a validated plan to the product map
    fn apply_plan(&mut self, plan: &ReconciliationPlan) {
        for delta in plan.deltas() {
            match self.products.get_mut(&delta.code) {
                Some(product) => product.stock -= delta.delta,
                None => tracing::warn!(
                    code = %delta.code,
                    "product deleted since billing; stock restoration skipped"
                ),
            }
        }
    }

    fn names_with_fallback(&self, old: &Bill) -> HashMap<ProductCode, String> {
        let mut names: HashMap<ProductCode, String> = old
            .items
            .iter()
            .map(|item| (item.code.clone(), item.name.clone()))
            .collect();
        for product in self.products.values() {
            names.insert(product.code.clone(), product.name.clone());
        }
        names
    }
}

/// In-memory implementation of `InventoryStore` and `BillStore`
///
/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn create_product(&self, new: NewProduct) -> Result<Product, InventoryError> {
        let mut state = self.state.lock().await;
        if state.products.contains_key(&new.code) {
            return Err(InventoryError::DuplicateCode { code: new.code });
        }
        let product = new.into_product();
        state.products.insert(product.code.clone(), product.clone());
        Ok(product)
    }

    async fn get_product(&self, code: &ProductCode) -> Result<Product, InventoryError> {
        let state = self.state.lock().await;
        state
            .products
            .get(code)
            .cloned()
            .ok_or_else(|| InventoryError::ProductNotFound { code: code.clone() })
    }

    async fn list_products(&self) -> Result<Vec<Product>, InventoryError> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|a, b| natural_cmp(a.code.as_str(), b.code.as_str()));
        Ok(products)
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, InventoryError> {
        let state = self.state.lock().await;
        Ok(filter_catalog(state.products.values(), query))
    }

    async fn update_product(
        &self,
        code: &ProductCode,
        patch: ProductPatch,
    ) -> Result<Product, InventoryError> {
        let mut state = self.state.lock().await;
        let product = state
            .products
            .get_mut(code)
            .ok_or_else(|| InventoryError::ProductNotFound { code: code.clone() })?;
        patch.apply(product)?;
        Ok(product.clone())
    }

    async fn delete_product(&self, code: &ProductCode) -> Result<(), InventoryError> {
        let mut state = self.state.lock().await;
        state
            .products
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| InventoryError::ProductNotFound { code: code.clone() })
    }
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn create_bill(&self, new: NewBill) -> Result<Bill, BillingError> {
        let mut state = self.state.lock().await;

        let snapshot = state.snapshot(new.items.iter().map(|i| i.code.clone()));
        // Validate everything before anything mutates
        let plan = plan_creation(&new.items, &snapshot)?;

        let invoice_no = next_invoice_no(state.bills.keys().map(|k| InvoiceNo::new(*k)));
        state.apply_plan(&plan);

        let items = compose_items(&new.items, &snapshot.names())?;
        let total = grand_total(&items, new.discount);
        let bill = Bill {
            invoice_no,
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            date: Utc::now(),
            items,
            discount: new.discount,
            grand_total: total,
        };
        state.bills.insert(invoice_no.value(), bill.clone());
        Ok(bill)
    }

    async fn get_bill(&self, invoice_no: InvoiceNo) -> Result<Bill, BillingError> {
        let state = self.state.lock().await;
        state
            .bills
            .get(&invoice_no.value())
            .cloned()
            .ok_or(BillingError::BillNotFound { invoice_no })
    }

    async fn list_bills(&self) -> Result<Vec<Bill>, BillingError> {
        let state = self.state.lock().await;
        Ok(state.bills.values().rev().cloned().collect())
    }

    async fn update_bill(
        &self,
        invoice_no: InvoiceNo,
        update: BillUpdate,
    ) -> Result<Bill, BillingError> {
        let mut state = self.state.lock().await;

        let old = state
            .bills
            .get(&invoice_no.value())
            .cloned()
            .ok_or(BillingError::BillNotFound { invoice_no })?;

        let codes = old
            .items
            .iter()
            .map(|i| i.code.clone())
            .chain(update.items.iter().map(|i| i.code.clone()));
        let snapshot = state.snapshot(codes);

        // Validate the full delta set before applying any of it
        let plan = plan_update(&old.items, &update.items, &snapshot)?;
        state.apply_plan(&plan);

        let names = state.names_with_fallback(&old);
        let items = compose_items(&update.items, &names)?;
        let total = grand_total(&items, update.discount);

        let bill = Bill {
            invoice_no,
            customer_name: update.customer_name,
            customer_phone: update.customer_phone,
            date: old.date,
            items,
            discount: update.discount,
            grand_total: total,
        };
        state.bills.insert(invoice_no.value(), bill.clone());
        Ok(bill)
    }

    async fn delete_bill(&self, invoice_no: InvoiceNo) -> Result<(), BillingError> {
        let mut state = self.state.lock().await;

        let bill = state
            .bills
            .remove(&invoice_no.value())
            .ok_or(BillingError::BillNotFound { invoice_no })?;

        let plan = plan_reversal(&bill.items);
        state.apply_plan(&plan);
        Ok(())
    }
}
