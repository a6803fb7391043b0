use serde::{Deserialize, Serialize};

use robodepot_core::{DomainError, DomainResult};

/// Non-negative monetary amount in minor units (cents).
///
/// Serialized as a decimal number of major units (`12.5` = 1250 cents) to match
/// the dashboard's data files.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Parse a decimal amount, rounding to the nearest cent.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(format!(
                "amount must be a finite non-negative number, got {amount}"
            )));
        }
        let cents = (amount * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(DomainError::validation("amount is too large"));
        }
        Ok(Self(cents as u64))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `self * quantity`, saturating instead of overflowing.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl TryFrom<f64> for Money {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.as_decimal()
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(&format!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_amounts_round_to_cents() {
        assert_eq!(Money::from_decimal(12.5).unwrap().cents(), 1250);
        assert_eq!(Money::from_decimal(19.999).unwrap().cents(), 2000);
        assert_eq!(Money::from_cents(1205).to_string(), "12.05");
    }

    #[test]
    fn negative_and_non_finite_are_rejected() {
        assert!(Money::from_decimal(-0.01).is_err());
        assert!(Money::from_decimal(f64::NAN).is_err());
        assert!(Money::from_decimal(f64::INFINITY).is_err());
    }

    #[test]
    fn totals_sum_and_multiply() {
        let unit = Money::from_cents(250);
        assert_eq!(unit.times(4), Money::from_cents(1000));
        let total: Money = [unit, unit.times(2)].into_iter().sum();
        assert_eq!(total.cents(), 750);
    }
}
