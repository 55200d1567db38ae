use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exact decimal amount used for limits, thresholds, and transaction values.
///
/// Serialized as a decimal string (`"12.50"`); deserializes from a string or a number.
/// Sign is not enforced here: negative values are rejected by domain validation so that
/// "cannot evaluate" stays distinguishable from a malformed wire value.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Money(#[schemars(with = "String")] Decimal);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{input}': {reason}")]
pub struct MoneyParseError {
    pub input: String,
    pub reason: String,
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Whole currency units, e.g. `Money::from_major(50)` is `50`.
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Hundredths of a currency unit, e.g. `Money::from_minor(4501)` is `45.01`.
    pub fn from_minor(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whole hundredths, rounding half away from zero. `None` if out of `i64` range.
    pub fn to_minor(&self) -> Option<i64> {
        use rust_decimal::prelude::ToPrimitive;
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// `None` on overflow of the 96-bit decimal range.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    /// Accepts an optional leading `$` and `,` thousands separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let digits: String = rest
            .strip_prefix('$')
            .unwrap_or(rest)
            .chars()
            .filter(|c| *c != ',')
            .collect();

        if digits.is_empty() {
            return Err(MoneyParseError {
                input: s.to_string(),
                reason: "empty amount".to_string(),
            });
        }
        if digits.starts_with(['-', '+']) {
            return Err(MoneyParseError {
                input: s.to_string(),
                reason: "unexpected sign".to_string(),
            });
        }

        let value = Decimal::from_str(&digits).map_err(|e| MoneyParseError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Money(if negative { -value } else { value }))
    }
}
