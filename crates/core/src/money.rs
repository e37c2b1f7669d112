//! Money value object: minor currency units, compared by value.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A non-negative monetary amount in minor currency units (e.g. cents).
///
/// Non-negative by construction; all arithmetic is checked (trapping), never
/// saturating, so overflow is reported instead of silently clamped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(amount: i64) -> Result<Self, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::invalid_amount("amount must be non-negative"));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> Result<Money, LedgerError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// Subtract, failing when the result would drop below zero.
    pub fn checked_sub(self, other: Money) -> Result<Money, LedgerError> {
        let result = self
            .0
            .checked_sub(other.0)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Money::new(result)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
