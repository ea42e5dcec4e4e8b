use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const CENTS_PER_UNIT: i64 = 100;
const BPS_DENOMINATOR: i128 = 10_000;

/// An amount of money in minor units (cents).
///
/// Arithmetic is checked: every operation that can overflow returns an
/// `Option`, and rounding is always toward negative infinity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Share of this amount given in basis points (1/100 of a percent).
    #[must_use]
    pub fn percent_bps(self, bps: u32) -> Option<Self> {
        let scaled = i128::from(self.0) * i128::from(bps);
        i64::try_from(scaled.div_euclid(BPS_DENOMINATOR))
            .ok()
            .map(Self)
    }

    /// `part / whole` of this amount; `None` when `whole` is zero.
    #[must_use]
    pub fn proportion(self, part: u32, whole: u32) -> Option<Self> {
        if whole == 0 {
            return None;
        }
        let scaled = i128::from(self.0) * i128::from(part);
        i64::try_from(scaled.div_euclid(i128::from(whole)))
            .ok()
            .map(Self)
    }

    /// `part / whole` of this amount for money-valued weights, rounded down;
    /// `None` when `whole` is not positive.
    #[must_use]
    pub fn share(self, part: Self, whole: Self) -> Option<Self> {
        if whole.0 <= 0 {
            return None;
        }
        let scaled = i128::from(self.0) * i128::from(part.0);
        i64::try_from(scaled.div_euclid(i128::from(whole.0)))
            .ok()
            .map(Self)
    }

    /// Number of whole currency units, rounded down.
    #[must_use]
    pub const fn whole_units(self) -> i64 {
        self.0.div_euclid(CENTS_PER_UNIT)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = CENTS_PER_UNIT.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / unit, abs % unit)
    }
}

impl FromStr for Money {
    type Err = CoreError;

    /// Parses `12`, `12.5`, `12.50` or `-3.10`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidMoney(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if units.is_empty() || !units.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if digits.ends_with('.') {
            return Err(invalid());
        }

        let units: i64 = units.parse().map_err(|_| invalid())?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -total } else { total }))
    }
}
