//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as JSON numbers (that is what the billing server sends and
//! expects back), but are held as [`Decimal`] so subtotals never pick up
//! binary floating point drift.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display symbol for the storefront currency (Bangladeshi taka).
pub const CURRENCY_SYMBOL: &str = "৳";

/// Arithmetic on prices left the representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Price arithmetic overflowed")]
pub struct PriceError;

/// A price in the storefront currency.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Amount rounded to two places behind an arbitrary symbol.
    ///
    /// Used where the taka sign cannot be rendered (PDF base fonts).
    #[must_use]
    pub fn format_with(&self, symbol: &str) -> String {
        format!("{symbol}{:.2}", self.0)
    }

    /// `self + rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Result<Self, PriceError> {
        self.0.checked_add(rhs.0).map(Self).ok_or(PriceError)
    }

    /// `self * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the product does not fit in a `Decimal`.
    pub fn checked_mul(self, quantity: u32) -> Result<Self, PriceError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self)
            .ok_or(PriceError)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}
