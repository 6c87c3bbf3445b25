use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places between the ledger's smallest unit and the
/// display unit (wei -> ether).
const ETHER_SCALE: u32 = 18;

/// Currency errors raised when converting between display and ledger units.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("unparseable amount: {0}")]
    Unparseable(String),

    #[error("amount is negative: {0}")]
    Negative(String),

    #[error("amount exceeds representable range: {0}")]
    OutOfRange(String),
}

/// Fixed-point amount in the ledger's smallest currency unit.
///
/// All ledger arithmetic happens on this integer representation; the ether
/// form exists only for display and metadata text.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Wei(pub u128);

impl Wei {
    pub const ZERO: Wei = Wei(0);

    /// Parse a decimal ether string ("0.05") into wei.
    ///
    /// Digits below wei resolution are truncated.
    pub fn from_ether_str(ether: &str) -> Result<Self, CurrencyError> {
        let amount = Decimal::from_str(ether)
            .map_err(|_| CurrencyError::Unparseable(ether.to_string()))?;
        if amount.is_sign_negative() {
            return Err(CurrencyError::Negative(ether.to_string()));
        }
        let factor = Decimal::from(10u64.pow(ETHER_SCALE / 2));
        let scaled = amount
            .checked_mul(factor)
            .and_then(|half| half.checked_mul(factor))
            .ok_or_else(|| CurrencyError::OutOfRange(ether.to_string()))?;
        scaled
            .trunc()
            .to_u128()
            .map(Wei)
            .ok_or_else(|| CurrencyError::OutOfRange(ether.to_string()))
    }

    /// Render as an ether string with trailing zeros trimmed ("0.05", "1").
    pub fn format_ether(&self) -> String {
        let whole = self.0 / 10u128.pow(ETHER_SCALE);
        let frac = self.0 % 10u128.pow(ETHER_SCALE);
        if frac == 0 {
            return whole.to_string();
        }
        let frac_str = format!("{:018}", frac);
        let frac_str = frac_str.trim_end_matches('0');
        format!("{}.{}", whole, frac_str)
    }

    pub fn checked_add(self, other: Wei) -> Option<Wei> {
        self.0.checked_add(other.0).map(Wei)
    }

    pub fn checked_sub(self, other: Wei) -> Option<Wei> {
        self.0.checked_sub(other.0).map(Wei)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ether_round_trip() {
        let fee = Wei::from_ether_str("0.05").unwrap();
        assert_eq!(fee, Wei(50_000_000_000_000_000));
        assert_eq!(fee.format_ether(), "0.05");
    }

    #[test]
    fn whole_ether_has_no_fraction() {
        let one = Wei::from_ether_str("1").unwrap();
        assert_eq!(one, Wei(1_000_000_000_000_000_000));
        assert_eq!(one.format_ether(), "1");
    }

    #[test]
    fn zero_is_allowed() {
        assert_eq!(Wei::from_ether_str("0").unwrap(), Wei::ZERO);
        assert_eq!(Wei::ZERO.format_ether(), "0");
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(matches!(
            Wei::from_ether_str("-0.1"),
            Err(CurrencyError::Negative(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            Wei::from_ether_str("five"),
            Err(CurrencyError::Unparseable(_))
        ));
    }

    #[test]
    fn sub_wei_digits_truncate() {
        // 19 decimal places: the final digit is below wei resolution.
        let fee = Wei::from_ether_str("0.0000000000000000015").unwrap();
        assert_eq!(fee, Wei(1));
    }
}
