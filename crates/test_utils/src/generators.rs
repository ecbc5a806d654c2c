//! Test data generators
//!
//! Proptest strategies that maintain domain invariants, plus fake-data
//! helpers for realistic customer fields.

use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use proptest::prelude::*;

use core_kernel::{Money, ProductCode};
use domain_billing::NewLineItem;

/// Strategy for generating valid product codes
pub fn product_code_strategy() -> impl Strategy<Value = ProductCode> {
    "[A-Z][0-9]{1,3}".prop_map(|s| ProductCode::new(s).expect("generated code is non-empty"))
}

/// Strategy for generating positive quantities
pub fn qty_strategy() -> impl Strategy<Value = i64> {
    1i64..100i64
}

/// Strategy for generating positive unit prices in minor units
pub fn price_strategy() -> impl Strategy<Value = Money> {
    (100i64..1_000_000i64).prop_map(Money::from_minor)
}

/// Strategy for generating a requested line item
pub fn line_item_strategy() -> impl Strategy<Value = NewLineItem> {
    (product_code_strategy(), qty_strategy(), price_strategy()).prop_map(
        |(code, qty, price)| NewLineItem { code, qty, price },
    )
}

/// Generates a realistic customer name
pub fn fake_customer_name() -> String {
    Name().fake()
}

/// Generates a realistic customer phone number
pub fn fake_customer_phone() -> String {
    PhoneNumber().fake()
}
