use std::{
    fmt,
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{
    de::{self, Visitor},
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The number of minor units (centimes) in one display unit.
pub const MINOR_UNITS_PER_UNIT: i64 = 100;
const FRACTION_DIGITS: usize = 2;

//--------------------------------------       Money         ---------------------------------------------------------
/// A fixed-point monetary amount, stored as a whole number of minor units.
///
/// Amounts never pass through binary floating point on their way into the ledger: decimal strings are parsed digit by
/// digit, and the database stores the minor-unit integer.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, AddAssign, add_assign);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    pub fn from_units(units: i64) -> Self {
        Self(units * MINOR_UNITS_PER_UNIT)
    }

    /// The amount in minor units.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_unit = MINOR_UNITS_PER_UNIT.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_unit, abs % per_unit)
    }
}

impl FromStr for Money {
    type Err = MoneyConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(MoneyConversionError(format!("'{s}' is not a number")));
        }
        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !is_digits(whole) || !is_digits(fraction) {
            return Err(MoneyConversionError(format!("'{s}' is not a number")));
        }
        if fraction.len() > FRACTION_DIGITS {
            return Err(MoneyConversionError(format!("'{s}' has more than {FRACTION_DIGITS} decimal places")));
        }
        let overflow = || MoneyConversionError(format!("'{s}' is too large"));
        let whole_value = if whole.is_empty() { 0 } else { whole.parse::<i64>().map_err(|_| overflow())? };
        let mut fraction_value = if fraction.is_empty() { 0 } else { fraction.parse::<i64>().map_err(|_| overflow())? };
        for _ in fraction.len()..FRACTION_DIGITS {
            fraction_value *= 10;
        }
        let minor = whole_value
            .checked_mul(MINOR_UNITS_PER_UNIT)
            .and_then(|v| v.checked_add(fraction_value))
            .ok_or_else(overflow)?;
        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount with at most two decimal places")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(MINOR_UNITS_PER_UNIT).map(Money).ok_or_else(|| E::custom(format!("{v} is too large")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("{v} is too large")))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("{v} is not a valid amount")));
        }
        // The shortest round-trip representation is exactly what the client wrote, e.g. 12.5
        v.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
