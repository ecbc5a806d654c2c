//! Bill records and validated inputs
//!
//! A bill is a persisted sales transaction: customer details, line items
//! with name/price snapshots, a discount, and a grand total. Inputs arrive
//! as explicit structs with named fields; nothing client-supplied is merged
//! into the stored record unvalidated, and totals are always recomputed
//! server-side from quantity, price, and discount.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{natural_cmp, InvoiceNo, Money, ProductCode};

use crate::error::BillingError;

/// A line item on a bill
///
/// `name` and `price` are snapshots taken at billing time; editing or
/// deleting the product later never rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Weak reference to the product (lookup only, no cascade)
    pub code: ProductCode,
    /// Product name at billing time
    pub name: String,
    /// Units sold
    pub qty: i64,
    /// Unit price at billing time (caller picks the tier)
    pub price: Money,
    /// `qty × price`, recomputed server-side
    pub total: Money,
}

/// A persisted sales transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique sequential invoice number; never changes after creation
    pub invoice_no: InvoiceNo,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    /// Creation timestamp
    pub date: DateTime<Utc>,
    /// Line items, kept in natural code order
    pub items: Vec<LineItem>,
    pub discount: Money,
    /// `max(0, Σ item totals − discount)`, recomputed server-side
    pub grand_total: Money,
}

impl Bill {
    /// Sorts line items by natural code order
    ///
    /// Persisting and fetching always go through this, so repeated reads
    /// return identical ordering.
    pub fn sort_items(&mut self) {
        self.items
            .sort_by(|a, b| natural_cmp(a.code.as_str(), b.code.as_str()));
    }

    /// Recomputes the grand total from items and discount
    pub fn recalculate_grand_total(&mut self) {
        let subtotal: Money = self.items.iter().map(|i| i.total).sum();
        self.grand_total = subtotal.sub_or_zero(&self.discount);
    }
}

/// A requested line item: code, quantity, and the unit price the operator
/// chose (retail or wholesale tier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub code: ProductCode,
    pub qty: i64,
    pub price: Money,
}

/// Input for creating a bill
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBill {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub items: Vec<NewLineItem>,
    pub discount: Money,
}

/// Input for updating a bill
///
/// Carries the complete replacement state; the stock delta against the
/// existing bill is derived by the reconciliation planner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillUpdate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub items: Vec<NewLineItem>,
    pub discount: Money,
}

/// Builds line items from requests, snapshotting names and recomputing totals
///
/// `names` maps codes to the name snapshot to store; callers resolve it from
/// the current catalog, falling back to the previous bill's snapshot on
/// update paths where a product has since been deleted. A code absent from
/// the map falls back to the code itself.
///
/// Zero-quantity requests are dropped: on update they mean "remove this
/// line", with the planner restoring the stock.
pub fn compose_items(
    requests: &[NewLineItem],
    names: &HashMap<ProductCode, String>,
) -> Result<Vec<LineItem>, BillingError> {
    let mut items = Vec::with_capacity(requests.len());
    for request in requests {
        if request.qty == 0 {
            continue;
        }
        let name = names
            .get(&request.code)
            .cloned()
            .unwrap_or_else(|| request.code.to_string());
        let total = request.price.times(request.qty)?;
        items.push(LineItem {
            code: request.code.clone(),
            name,
            qty: request.qty,
            price: request.price,
            total,
        });
    }
    items.sort_by(|a, b| natural_cmp(a.code.as_str(), b.code.as_str()));
    Ok(items)
}

/// Computes the grand total for a set of items and a discount
pub fn grand_total(items: &[LineItem], discount: Money) -> Money {
    let subtotal: Money = items.iter().map(|i| i.total).sum();
    subtotal.sub_or_zero(&discount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    fn request(c: &str, qty: i64, price: i64) -> NewLineItem {
        NewLineItem {
            code: code(c),
            qty,
            price: Money::new(price.into()),
        }
    }

    #[test]
    fn test_compose_recomputes_totals() {
        let names = HashMap::from([(code("F100"), "Rocket".to_string())]);
        let items = compose_items(&[request("F100", 5, 70)], &names).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Rocket");
        assert_eq!(items[0].total, Money::new(dec!(350)));
    }

    #[test]
    fn test_compose_sorts_naturally() {
        let names = HashMap::new();
        let items = compose_items(
            &[request("F100", 1, 10), request("F9", 1, 10), request("F10", 1, 10)],
            &names,
        )
        .unwrap();
        let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["F9", "F10", "F100"]);
    }

    #[test]
    fn test_compose_drops_zero_quantities() {
        let items = compose_items(
            &[request("F100", 0, 70), request("F200", 2, 30)],
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code.as_str(), "F200");
    }

    #[test]
    fn test_grand_total_applies_discount() {
        let names = HashMap::new();
        let items = compose_items(&[request("F100", 5, 70)], &names).unwrap();
        assert_eq!(
            grand_total(&items, Money::new(dec!(10))),
            Money::new(dec!(340))
        );
    }

    #[test]
    fn test_grand_total_clamps_at_zero() {
        let names = HashMap::new();
        let items = compose_items(&[request("F100", 1, 10)], &names).unwrap();
        assert_eq!(grand_total(&items, Money::new(dec!(50))), Money::zero());
    }

    #[test]
    fn test_sort_items_is_idempotent() {
        let names = HashMap::new();
        let items = compose_items(
            &[request("A2", 1, 10), request("A10", 1, 10), request("A1", 1, 10)],
            &names,
        )
        .unwrap();
        let mut bill = Bill {
            invoice_no: InvoiceNo::FIRST,
            customer_name: None,
            customer_phone: None,
            date: Utc::now(),
            items,
            discount: Money::zero(),
            grand_total: Money::zero(),
        };
        bill.sort_items();
        let first = bill.items.clone();
        bill.sort_items();
        assert_eq!(first, bill.items);
        let codes: Vec<&str> = bill.items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "A2", "A10"]);
    }
}
