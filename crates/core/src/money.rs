//! Minor-unit money amounts and the arithmetic helpers pricing is built on.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during amount arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// A percentage calculation could not be safely represented in minor units.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A minor-unit multiplication overflowed.
    #[error("amount arithmetic overflowed")]
    Overflow,
}

/// A non-negative money amount in minor units (piastres/cents).
///
/// The engine is single-currency; all amounts share the store currency and
/// two decimal places.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero minor units.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// The amount in minor units.
    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the sum does not fit in minor
    /// units.
    pub const fn checked_add(self, other: Self) -> Result<Self, AmountError> {
        match self.0.checked_add(other.0) {
            Some(sum) => Ok(Self(sum)),
            None => Err(AmountError::Overflow),
        }
    }

    /// Saturating subtraction, clamped at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// The smaller of two amounts.
    #[must_use]
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Calculates `percent` percent of `amount`, rounded half away from zero.
///
/// `percent` is expressed on a 0–100 scale, so `Decimal::from(15)` means 15%.
///
/// # Errors
///
/// Returns [`AmountError::PercentConversion`] when the intermediate decimal
/// arithmetic overflows or the result does not fit in minor units (for
/// example with a negative percentage).
pub fn percent_of(amount: Amount, percent: Decimal) -> Result<Amount, AmountError> {
    let minor = Decimal::from(amount.minor());

    let applied = minor
        .checked_mul(percent)
        .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(AmountError::PercentConversion)?;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .map(Amount::from_minor)
        .ok_or(AmountError::PercentConversion)
}

/// Calculates the total for a line of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`AmountError::Overflow`] when the multiplication overflows.
pub fn line_total(unit_price: Amount, quantity: u32) -> Result<Amount, AmountError> {
    unit_price
        .minor()
        .checked_mul(u64::from(quantity))
        .map(Amount::from_minor)
        .ok_or(AmountError::Overflow)
}
