//! Bill classification
//!
//! The edit screen differs for retail and wholesale bills, and a bill does
//! not record which tier it was sold at. Classification compares each line
//! item's stored unit price against the product's *current* retail price:
//! if every item matches, the bill routes to the retail editor, otherwise
//! wholesale. Purely a routing hint, never safety-critical.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use core_kernel::{Money, ProductCode};

use crate::bill::Bill;

/// Which edit flow a bill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillClass {
    Retail,
    Wholesale,
}

/// Classifies a bill against current retail prices
///
/// `retail_prices` maps product codes to their current retail price; codes
/// missing from the map (deleted products) count as mismatches. Prices are
/// compared as decimals by numeric value, so `70` and `70.00` agree.
pub fn classify(bill: &Bill, retail_prices: &HashMap<ProductCode, Money>) -> BillClass {
    let all_retail = bill.items.iter().all(|item| {
        retail_prices
            .get(&item.code)
            .map(|retail| retail.amount() == item.price.amount())
            .unwrap_or(false)
    });

    if all_retail {
        BillClass::Retail
    } else {
        BillClass::Wholesale
    }
}
