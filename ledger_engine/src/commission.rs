//! Platform commission and the producer/platform split of a settled order.
use std::{fmt::Display, str::FromStr};

use ledger_common::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BASIS_POINTS_PER_UNIT: u32 = 10_000;
pub const DEFAULT_COMMISSION_BASIS_POINTS: u32 = 1_800;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid commission rate: {0}")]
pub struct CommissionRateError(String);

//--------------------------------------    CommissionRate     ---------------------------------------------------------
/// The fraction of an order's total that the platform keeps, in basis points (1/100 of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRate(u32);

impl Default for CommissionRate {
    fn default() -> Self {
        Self(DEFAULT_COMMISSION_BASIS_POINTS)
    }
}

impl CommissionRate {
    pub fn from_basis_points(bps: u32) -> Result<Self, CommissionRateError> {
        if bps > BASIS_POINTS_PER_UNIT {
            return Err(CommissionRateError(format!("{bps} basis points is more than 100%")));
        }
        Ok(Self(bps))
    }

    pub fn from_percent(percent: u32) -> Result<Self, CommissionRateError> {
        Self::from_basis_points(percent.saturating_mul(100))
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }

    /// Splits `total` between the platform and the producer.
    ///
    /// The commission is rounded *up* to the nearest minor unit, so any fractional remainder goes to the platform and
    /// `platform_commission + producer_earnings == total` always holds exactly.
    pub fn split(&self, total: Money) -> Split {
        let numerator = i128::from(total.value()) * i128::from(self.0);
        let denominator = i128::from(BASIS_POINTS_PER_UNIT);
        let commission = if numerator >= 0 {
            (numerator + denominator - 1) / denominator
        } else {
            numerator / denominator
        };
        // |commission| <= |total|, so this always fits
        let platform_commission = Money::from_minor(commission as i64);
        Split { total, platform_commission, producer_earnings: total - platform_commission }
    }
}

impl Display for CommissionRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for CommissionRate {
    type Err = CommissionRateError;

    /// Parses a percentage such as `18`, `18.5` or `18%`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let invalid = || CommissionRateError(format!("'{s}' is not a percentage"));
        if whole.is_empty() || fraction.len() > 2 {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole = whole.parse::<u32>().map_err(|_| invalid())?;
        let mut hundredths = if fraction.is_empty() { 0 } else { fraction.parse::<u32>().map_err(|_| invalid())? };
        if fraction.len() == 1 {
            hundredths *= 10;
        }
        let bps = whole.checked_mul(100).and_then(|v| v.checked_add(hundredths)).ok_or_else(invalid)?;
        Self::from_basis_points(bps)
    }
}

//--------------------------------------         Split         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Split {
    total: Money,
    platform_commission: Money,
    producer_earnings: Money,
}

impl Split {
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn platform_commission(&self) -> Money {
        self.platform_commission
    }

    pub fn producer_earnings(&self) -> Money {
        self.producer_earnings
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn eighteen_percent_of_fifty_thousand() {
        let rate = CommissionRate::default();
        let split = rate.split(Money::from_units(50_000));
        assert_eq!(split.platform_commission(), Money::from_units(9_000));
        assert_eq!(split.producer_earnings(), Money::from_units(41_000));
    }

    #[test]
    fn remainder_goes_to_the_platform() {
        let rate = CommissionRate::default();
        // 1.01 * 18% = 0.1818
        let split = rate.split(Money::from_minor(101));
        assert_eq!(split.platform_commission(), Money::from_minor(19));
        assert_eq!(split.producer_earnings(), Money::from_minor(82));
        let split = rate.split(Money::from_minor(1));
        assert_eq!(split.platform_commission(), Money::from_minor(1));
        assert_eq!(split.producer_earnings(), Money::ZERO);
    }

    #[test]
    fn split_conserves_every_minor_unit() {
        for bps in [0, 1, 333, 1_250, 1_800, 5_000, 9_999, 10_000] {
            let rate = CommissionRate::from_basis_points(bps).unwrap();
            for minor in [1, 7, 99, 101, 12_345, 5_000_000, 987_654_321] {
                let total = Money::from_minor(minor);
                let split = rate.split(total);
                assert_eq!(split.platform_commission() + split.producer_earnings(), total);
                assert!(split.producer_earnings() >= Money::ZERO);
            }
        }
    }

    #[test]
    fn parse_percentages() {
        assert_eq!("18".parse::<CommissionRate>().unwrap().basis_points(), 1_800);
        assert_eq!("18.5%".parse::<CommissionRate>().unwrap().basis_points(), 1_850);
        assert_eq!(" 7.25 % ".parse::<CommissionRate>().unwrap().basis_points(), 725);
        assert_eq!("100".parse::<CommissionRate>().unwrap().basis_points(), 10_000);
        assert!("100.01".parse::<CommissionRate>().is_err());
        assert!("-5".parse::<CommissionRate>().is_err());
        assert!("18.123".parse::<CommissionRate>().is_err());
        assert!("abc".parse::<CommissionRate>().is_err());
        assert_eq!(CommissionRate::from_basis_points(1_850).unwrap().to_string(), "18.50%");
    }
}
