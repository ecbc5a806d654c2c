//! Stock reconciliation planning
//!
//! The reconciliation protocol keeps product stock consistent with bill line
//! items across bill creation, update, and deletion. Planning is pure: the
//! functions here take a [`StockSnapshot`] captured under the store's
//! serialization discipline (a row lock or a single-writer mutex) and either
//! return a [`ReconciliationPlan`] of per-code stock deltas or the first
//! validation error. No mutation happens until a plan exists for the whole
//! bill, so a failing line item can never leave stock half-adjusted.
//!
//! Delta sign convention follows the ledger: positive = units drawn from
//! inventory, negative = units returned. Applying a delta means
//! `stock -= delta`.

use std::collections::{BTreeMap, HashMap};

use core_kernel::{natural_cmp, ProductCode};

use crate::bill::{LineItem, NewLineItem};
use crate::error::BillingError;

/// Stock levels of the products visible to one reconciliation
///
/// Carries the product name alongside the count so validation errors can
/// name the offending product the way operators know it.
#[derive(Debug, Clone, Default)]
pub struct StockSnapshot {
    entries: HashMap<ProductCode, StockEntry>,
}

/// One product's state inside a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEntry {
    pub name: String,
    pub stock: i64,
}

impl StockSnapshot {
    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the snapshot
    pub fn insert(&mut self, code: ProductCode, name: impl Into<String>, stock: i64) {
        self.entries.insert(
            code,
            StockEntry {
                name: name.into(),
                stock,
            },
        );
    }

    /// Looks up a product entry
    pub fn get(&self, code: &ProductCode) -> Option<&StockEntry> {
        self.entries.get(code)
    }

    /// Current stock for a code, if the product exists
    pub fn stock_of(&self, code: &ProductCode) -> Option<i64> {
        self.entries.get(code).map(|e| e.stock)
    }

    /// Name snapshot map for composing line items
    pub fn names(&self) -> HashMap<ProductCode, String> {
        self.entries
            .iter()
            .map(|(code, entry)| (code.clone(), entry.name.clone()))
            .collect()
    }

    /// Applies a delta directly (test and in-memory use)
    pub fn adjust(&mut self, code: &ProductCode, delta: i64) -> bool {
        match self.entries.get_mut(code) {
            Some(entry) => {
                entry.stock -= delta;
                true
            }
            None => false,
        }
    }
}

impl FromIterator<(ProductCode, StockEntry)> for StockSnapshot {
    fn from_iter<I: IntoIterator<Item = (ProductCode, StockEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A signed stock adjustment for one product code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub code: ProductCode,
    /// Units to draw from inventory (negative = return)
    pub delta: i64,
}

/// The validated outcome of reconciliation planning
///
/// Holds only non-zero deltas, ordered by code, so adapters that take
/// per-row locks do it in a deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    deltas: Vec<StockDelta>,
}

impl ReconciliationPlan {
    /// The per-code adjustments, in natural code order
    pub fn deltas(&self) -> &[StockDelta] {
        &self.deltas
    }

    /// True if no stock changes are needed
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Applies every delta to a snapshot
    ///
    /// Returns the codes that were missing from the snapshot (deleted
    /// products on restore paths); callers log and skip those.
    pub fn apply_to(&self, snapshot: &mut StockSnapshot) -> Vec<ProductCode> {
        let mut missing = Vec::new();
        for StockDelta { code, delta } in &self.deltas {
            if !snapshot.adjust(code, *delta) {
                missing.push(code.clone());
            }
        }
        missing
    }

    fn from_map(deltas: BTreeMap<ProductCode, i64>) -> Self {
        let mut deltas: Vec<StockDelta> = deltas
            .into_iter()
            .filter(|(_, delta)| *delta != 0)
            .map(|(code, delta)| StockDelta { code, delta })
            .collect();
        deltas.sort_by(|a, b| natural_cmp(a.code.as_str(), b.code.as_str()));
        Self { deltas }
    }
}

/// Plans stock consumption for a new bill
///
/// Validates every requested item before producing any delta: the product
/// must exist, the quantity must be positive, and - with duplicate codes in
/// the payload combined - on-hand stock must cover the total request.
///
/// # Errors
///
/// - [`BillingError::ProductNotFound`] for an unknown code
/// - [`BillingError::InvalidQuantity`] for a non-positive quantity
/// - [`BillingError::InsufficientStock`] when stock cannot cover the request
pub fn plan_creation(
    items: &[NewLineItem],
    snapshot: &StockSnapshot,
) -> Result<ReconciliationPlan, BillingError> {
    for item in items {
        if snapshot.get(&item.code).is_none() {
            return Err(BillingError::ProductNotFound {
                code: item.code.clone(),
            });
        }
        if item.qty <= 0 {
            return Err(BillingError::InvalidQuantity {
                code: item.code.clone(),
                qty: item.qty,
            });
        }
    }

    let requested = aggregate_new(items);
    for (code, qty) in &requested {
        let entry = snapshot.get(code).expect("existence checked above");
        if entry.stock < *qty {
            return Err(BillingError::InsufficientStock {
                code: code.clone(),
                name: entry.name.clone(),
                available: entry.stock,
                requested: *qty,
            });
        }
    }

    Ok(ReconciliationPlan::from_map(requested))
}

/// Plans the stock delta between a bill's current and requested state
///
/// Per code over the union of old and new code sets, `delta = new − old`.
/// Positive deltas draw additional units and are validated like a creation;
/// negative deltas return units and need no validation. A product that has
/// vanished is only an error when more units of it are requested - returned
/// units for deleted products are tolerated (the plan still carries the
/// delta; appliers skip and log the missing row).
///
/// # Errors
///
/// - [`BillingError::InvalidQuantity`] for a negative requested quantity
/// - [`BillingError::ProductNotFound`] for a positive delta on an unknown code
/// - [`BillingError::InsufficientStock`] when stock cannot cover a positive delta
pub fn plan_update(
    old_items: &[LineItem],
    new_items: &[NewLineItem],
    snapshot: &StockSnapshot,
) -> Result<ReconciliationPlan, BillingError> {
    for item in new_items {
        // Zero is allowed on update: it removes the line and returns stock
        if item.qty < 0 {
            return Err(BillingError::InvalidQuantity {
                code: item.code.clone(),
                qty: item.qty,
            });
        }
    }

    let old: BTreeMap<ProductCode, i64> = aggregate_old(old_items);
    let new: BTreeMap<ProductCode, i64> = aggregate_new(new_items);

    let mut deltas = BTreeMap::new();
    for code in old.keys().chain(new.keys()) {
        let before = old.get(code).copied().unwrap_or(0);
        let after = new.get(code).copied().unwrap_or(0);
        deltas.insert(code.clone(), after - before);
    }

    for (code, delta) in &deltas {
        if *delta <= 0 {
            if *delta < 0 && snapshot.get(code).is_none() {
                tracing::debug!(%code, returned = -delta, "returning stock for vanished product");
            }
            continue;
        }
        match snapshot.get(code) {
            None => {
                return Err(BillingError::ProductNotFound { code: code.clone() });
            }
            Some(entry) if entry.stock < *delta => {
                return Err(BillingError::InsufficientStock {
                    code: code.clone(),
                    name: entry.name.clone(),
                    available: entry.stock,
                    requested: *delta,
                });
            }
            Some(_) => {}
        }
    }

    Ok(ReconciliationPlan::from_map(deltas))
}

/// Plans full stock restoration for a deleted bill
///
/// Every line item's quantity flows back to inventory. Restoration cannot
/// drive stock negative, so there is nothing to validate.
pub fn plan_reversal(items: &[LineItem]) -> ReconciliationPlan {
    let mut deltas = BTreeMap::new();
    for item in items {
        *deltas.entry(item.code.clone()).or_insert(0) -= item.qty;
    }
    ReconciliationPlan::from_map(deltas)
}

fn aggregate_new(items: &[NewLineItem]) -> BTreeMap<ProductCode, i64> {
    let mut totals = BTreeMap::new();
    for item in items {
        *totals.entry(item.code.clone()).or_insert(0) += item.qty;
    }
    totals
}

fn aggregate_old(items: &[LineItem]) -> BTreeMap<ProductCode, i64> {
    let mut totals = BTreeMap::new();
    for item in items {
        *totals.entry(item.code.clone()).or_insert(0) += item.qty;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Money;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    fn request(c: &str, qty: i64) -> NewLineItem {
        NewLineItem {
            code: code(c),
            qty,
            price: Money::new(dec!(70)),
        }
    }

    fn line(c: &str, qty: i64) -> LineItem {
        LineItem {
            code: code(c),
            name: c.to_string(),
            qty,
            price: Money::new(dec!(70)),
            total: Money::new(dec!(70)).times(qty).unwrap(),
        }
    }

    fn snapshot(entries: &[(&str, i64)]) -> StockSnapshot {
        let mut snap = StockSnapshot::new();
        for (c, stock) in entries {
            snap.insert(code(c), c.to_string(), *stock);
        }
        snap
    }

    #[test]
    fn test_creation_happy_path() {
        let snap = snapshot(&[("A", 10)]);
        let plan = plan_creation(&[request("A", 3)], &snap).unwrap();
        assert_eq!(plan.deltas(), &[StockDelta { code: code("A"), delta: 3 }]);
    }

    #[test]
    fn test_creation_unknown_product() {
        let snap = snapshot(&[]);
        let err = plan_creation(&[request("A", 1)], &snap).unwrap_err();
        assert!(matches!(err, BillingError::ProductNotFound { .. }));
    }

    #[test]
    fn test_creation_rejects_non_positive_qty() {
        let snap = snapshot(&[("A", 10)]);
        let err = plan_creation(&[request("A", 0)], &snap).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidQuantity { qty: 0, .. }
        ));
    }

    #[test]
    fn test_creation_insufficient_stock() {
        let snap = snapshot(&[("A", 2)]);
        let err = plan_creation(&[request("A", 3)], &snap).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_creation_combines_duplicate_codes() {
        // 4 + 4 = 8 > 6 on hand, even though each row alone fits
        let snap = snapshot(&[("A", 6)]);
        let err = plan_creation(&[request("A", 4), request("A", 4)], &snap).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InsufficientStock {
                requested: 8,
                ..
            }
        ));
    }

    #[test]
    fn test_creation_validates_all_before_any_delta() {
        // Second item fails; the plan must not exist at all
        let snap = snapshot(&[("A", 10), ("B", 1)]);
        let err = plan_creation(&[request("A", 3), request("B", 5)], &snap).unwrap_err();
        assert!(matches!(err, BillingError::InsufficientStock { .. }));
    }

    #[test]
    fn test_update_delta_positive() {
        // {A: 3} -> {A: 5} with 7 on hand: delta 2
        let snap = snapshot(&[("A", 7)]);
        let plan = plan_update(&[line("A", 3)], &[request("A", 5)], &snap).unwrap();
        assert_eq!(plan.deltas(), &[StockDelta { code: code("A"), delta: 2 }]);
    }

    #[test]
    fn test_update_delta_positive_insufficient() {
        let snap = snapshot(&[("A", 1)]);
        let err = plan_update(&[line("A", 3)], &[request("A", 5)], &snap).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_update_delta_negative_needs_no_stock() {
        // Reducing quantity always succeeds, even at zero stock
        let snap = snapshot(&[("A", 0)]);
        let plan = plan_update(&[line("A", 5)], &[request("A", 2)], &snap).unwrap();
        assert_eq!(
            plan.deltas(),
            &[StockDelta { code: code("A"), delta: -3 }]
        );
    }

    #[test]
    fn test_update_removed_item_restores() {
        let snap = snapshot(&[("A", 0), ("B", 10)]);
        let plan = plan_update(&[line("A", 4)], &[request("B", 1)], &snap).unwrap();
        assert_eq!(
            plan.deltas(),
            &[
                StockDelta { code: code("A"), delta: -4 },
                StockDelta { code: code("B"), delta: 1 },
            ]
        );
    }

    #[test]
    fn test_update_tolerates_vanished_product_on_return() {
        // Product A was deleted after the bill was created; dropping it from
        // the bill must still succeed
        let snap = snapshot(&[("B", 10)]);
        let plan = plan_update(&[line("A", 4)], &[request("B", 1)], &snap).unwrap();
        assert_eq!(plan.deltas().len(), 2);
    }

    #[test]
    fn test_update_rejects_vanished_product_on_draw() {
        let snap = snapshot(&[]);
        let err = plan_update(&[line("A", 1)], &[request("A", 2)], &snap).unwrap_err();
        assert!(matches!(err, BillingError::ProductNotFound { .. }));
    }

    #[test]
    fn test_update_rejects_negative_quantity() {
        let snap = snapshot(&[("A", 10)]);
        let err = plan_update(&[], &[request("A", -1)], &snap).unwrap_err();
        assert!(matches!(
            err,
            BillingError::InvalidQuantity { qty: -1, .. }
        ));
    }

    #[test]
    fn test_update_zero_quantity_removes_line() {
        let snap = snapshot(&[("A", 0)]);
        let plan = plan_update(&[line("A", 2)], &[request("A", 0)], &snap).unwrap();
        assert_eq!(
            plan.deltas(),
            &[StockDelta { code: code("A"), delta: -2 }]
        );
    }

    #[test]
    fn test_update_unchanged_is_empty_plan() {
        let snap = snapshot(&[("A", 5)]);
        let plan = plan_update(&[line("A", 3)], &[request("A", 3)], &snap).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_reversal_restores_everything() {
        let plan = plan_reversal(&[line("A", 3), line("B", 2)]);
        assert_eq!(
            plan.deltas(),
            &[
                StockDelta { code: code("A"), delta: -3 },
                StockDelta { code: code("B"), delta: -2 },
            ]
        );
    }

    #[test]
    fn test_apply_to_reports_missing_codes() {
        let mut snap = snapshot(&[("A", 10)]);
        let plan = plan_reversal(&[line("A", 2), line("GONE", 5)]);
        let missing = plan.apply_to(&mut snap);
        assert_eq!(snap.stock_of(&code("A")), Some(12));
        assert_eq!(missing, vec![code("GONE")]);
    }

    #[test]
    fn test_deltas_sorted_naturally() {
        let snap = snapshot(&[("F9", 10), ("F10", 10), ("F100", 10)]);
        let plan = plan_creation(
            &[request("F100", 1), request("F9", 1), request("F10", 1)],
            &snap,
        )
        .unwrap();
        let codes: Vec<&str> = plan.deltas().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["F9", "F10", "F100"]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::Money;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn arb_catalog() -> impl Strategy<Value = Vec<(String, i64)>> {
        proptest::collection::vec(("[A-Z][0-9]{1,3}", 0i64..500), 1..8).prop_map(|mut v| {
            v.sort();
            v.dedup_by(|a, b| a.0 == b.0);
            v
        })
    }

    proptest! {
        /// Creating a bill and then reverting it restores the snapshot exactly.
        #[test]
        fn create_then_revert_conserves_stock(
            catalog in arb_catalog(),
            picks in proptest::collection::vec((0usize..8, 1i64..50), 1..6)
        ) {
            let mut snapshot = StockSnapshot::new();
            for (c, stock) in &catalog {
                snapshot.insert(ProductCode::new(c).unwrap(), c.clone(), *stock);
            }
            let items: Vec<NewLineItem> = picks
                .into_iter()
                .map(|(idx, qty)| {
                    let (c, _) = &catalog[idx % catalog.len()];
                    NewLineItem {
                        code: ProductCode::new(c).unwrap(),
                        qty,
                        price: Money::new(dec!(10)),
                    }
                })
                .collect();

            if let Ok(plan) = plan_creation(&items, &snapshot) {
                prop_assert!(plan.apply_to(&mut snapshot).is_empty());

                // No product may go negative after a committed creation
                for (c, _) in &catalog {
                    let code = ProductCode::new(c).unwrap();
                    prop_assert!(snapshot.stock_of(&code).unwrap() >= 0);
                }

                // Reverting the same lines restores the original snapshot
                let names = snapshot.names();
                let lines = crate::bill::compose_items(&items, &names).unwrap();
                let reversal = plan_reversal(&lines);
                prop_assert!(reversal.apply_to(&mut snapshot).is_empty());

                for (c, stock) in &catalog {
                    let code = ProductCode::new(c).unwrap();
                    prop_assert_eq!(snapshot.stock_of(&code), Some(*stock),
                        "stock not conserved for {}", c);
                }
            }
        }

        /// A validated update plan never drives any stock negative.
        #[test]
        fn update_plan_never_goes_negative(
            stock in 0i64..100,
            old_qty in 1i64..50,
            new_qty in 0i64..100
        ) {
            let code = ProductCode::new("A1").unwrap();
            let mut snapshot = StockSnapshot::new();
            snapshot.insert(code.clone(), "A1", stock);

            let old = vec![LineItem {
                code: code.clone(),
                name: "A1".to_string(),
                qty: old_qty,
                price: Money::new(dec!(10)),
                total: Money::new(dec!(10)).times(old_qty).unwrap(),
            }];
            let new = vec![NewLineItem {
                code: code.clone(),
                qty: new_qty,
                price: Money::new(dec!(10)),
            }];

            if let Ok(plan) = plan_update(&old, &new, &snapshot) {
                plan.apply_to(&mut snapshot);
                prop_assert!(snapshot.stock_of(&code).unwrap() >= 0);
            }
        }
    }
}
