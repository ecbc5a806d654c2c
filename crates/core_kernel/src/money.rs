//! Money type with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//! The POS operates in a single currency, so amounts carry no currency tag;
//! everything is stored to two decimal places.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount
///
/// Money uses rust_decimal for precise arithmetic without floating-point
/// errors. Amounts are normalized to 2 decimal places on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Number of decimal places amounts are stored with
    pub const DECIMAL_PLACES: u32 = 2;

    /// Creates a new Money value, rounding to 2 decimal places
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(Self::DECIMAL_PLACES))
    }

    /// Creates Money from an integer amount in minor units (e.g., paise)
    pub fn from_minor(minor_units: i64) -> Self {
        Self(Decimal::new(minor_units, Self::DECIMAL_PLACES))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the underlying decimal amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checked addition, failing on decimal overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Checked subtraction, failing on decimal overflow
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Money::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Multiplies a unit price by an integer quantity (line totals)
    pub fn times(&self, quantity: i64) -> Result<Money, MoneyError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Money::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Subtracts `other`, clamping the result at zero
    ///
    /// Used for discount application: a discount larger than the subtotal
    /// yields a zero grand total, never a negative one.
    pub fn sub_or_zero(&self, other: &Money) -> Money {
        if other.0 >= self.0 {
            Money::zero()
        } else {
            Money::new(self.0 - other.0)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sum_of_line_totals_matches_times(
            unit in 1i64..1_000_000i64,
            qty in 1i64..1_000i64
        ) {
            let price = Money::from_minor(unit);
            let total = price.times(qty).unwrap();
            let summed: Money = std::iter::repeat(price).take(qty as usize).sum();
            prop_assert_eq!(total, summed);
        }

        #[test]
        fn sub_or_zero_never_negative(
            a in 0i64..1_000_000i64,
            b in 0i64..1_000_000i64
        ) {
            let result = Money::from_minor(a).sub_or_zero(&Money::from_minor(b));
            prop_assert!(!result.is_negative());
        }
    }
}
