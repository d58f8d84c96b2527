//! # Money Module
//!
//! Provides the `Money` type for comparing monetary values safely.
//!
//! ## Integer Minor Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Form input "0.3" vs cost "0.1" + "0.2":                                │
//! │    0.1 + 0.2 = 0.30000000000000004  → "net price below cost"  ❌       │
//! │                                                                         │
//! │  Parsed to cents first:                                                 │
//! │    30 >= 10 + 20                      → passes                   ✅     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meem_core::money::Money;
//!
//! let net = Money::parse("10.50", 2).unwrap();
//! let cost = Money::from_cents(500);
//! assert!(net >= cost);
//! assert_eq!(net.to_string(), "10.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

/// Default number of fractional digits for prices (cents).
pub const DEFAULT_DECIMALS: u8 = 2;

/// Largest scale [`Money::parse`] accepts; 10^9 still leaves headroom in i64.
pub const MAX_DECIMALS: u8 = 9;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// The scale is not stored; every amount in one submission is parsed with
/// the same `decimals` taken from console configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use meem_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a user-entered decimal amount into minor units.
    ///
    /// ## Accepted Input
    /// ```text
    /// "10"      → 1000      (decimals = 2)
    /// "10.5"    → 1050
    /// " 10.50 " → 1050      surrounding whitespace is ignored
    /// "-3.25"   → -325
    /// ".5"      → 50
    /// "10."     → 1000
    /// ```
    ///
    /// ## Rejected Input
    /// Empty strings, a lone sign or dot, more fractional digits than
    /// `decimals`, any non-digit character, and values that overflow `i64`.
    ///
    /// ```rust
    /// use meem_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.5", 2).unwrap().cents(), 1050);
    /// assert!(Money::parse("10.555", 2).is_err());
    /// assert!(Money::parse("abc", 2).is_err());
    /// ```
    pub fn parse(input: &str, decimals: u8) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        if decimals > MAX_DECIMALS {
            return Err(ValidationError::OutOfRange {
                field: "decimals".to_string(),
                min: 0,
                max: i64::from(MAX_DECIMALS),
            });
        }

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("must contain at least one digit"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("must contain only digits and one decimal point"));
        }
        if fraction.len() > usize::from(decimals) {
            return Err(invalid("has too many decimal places"));
        }

        let overflow = || invalid("is too large");
        let scale = 10_i64.pow(u32::from(decimals));

        let whole_value = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| overflow())?
        };

        // Right-pad the fraction to the full scale: "5" at scale 2 is 50.
        let fraction_value = if fraction.is_empty() {
            0
        } else {
            let padding = 10_i64.pow((usize::from(decimals) - fraction.len()) as u32);
            fraction.parse::<i64>().map_err(|_| overflow())? * padding
        };

        let magnitude = whole_value
            .checked_mul(scale)
            .and_then(|v| v.checked_add(fraction_value))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }

    /// Formats the amount at the given scale.
    ///
    /// ```rust
    /// use meem_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(12345).display(3).to_string(), "12.345");
    /// assert_eq!(Money::from_cents(7).display(0).to_string(), "7");
    /// ```
    #[inline]
    pub fn display(self, decimals: u8) -> MoneyDisplay {
        MoneyDisplay {
            value: self.0,
            decimals: decimals.min(MAX_DECIMALS),
        }
    }
}

/// A [`Money`] paired with its currency scale, for formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyDisplay {
    value: i64,
    decimals: u8,
}

impl fmt::Display for MoneyDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value < 0 { "-" } else { "" };
        let abs = self.value.unsigned_abs();
        if self.decimals == 0 {
            return write!(f, "{}{}", sign, abs);
        }
        let scale = 10_u64.pow(u32::from(self.decimals));
        let width = usize::from(self.decimals);
        write!(f, "{}{}.{:0width$}", sign, abs / scale, abs % scale, width = width)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display at the default two-decimal scale: `"10.99"`, `"-5.50"`.
///
/// Only correct for cent-based currencies; use [`Money::display`] when the
/// configured scale may differ.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display(DEFAULT_DECIMALS).fmt(f)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1099);
        assert_eq!(m.cents(), 1099);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn test_display_at_scale() {
        assert_eq!(Money::from_cents(1500).display(3).to_string(), "1.500");
        assert_eq!(Money::from_cents(-5).display(3).to_string(), "-0.005");
        assert_eq!(Money::from_cents(42).display(0).to_string(), "42");
        assert_eq!(Money::from_cents(1099).display(2).to_string(), "10.99");
    }

    #[test]
    fn test_parse_accepts_common_inputs() {
        assert_eq!(Money::parse("10", 2).unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5", 2).unwrap().cents(), 1050);
        assert_eq!(Money::parse(" 10.50 ", 2).unwrap().cents(), 1050);
        assert_eq!(Money::parse(".5", 2).unwrap().cents(), 50);
        assert_eq!(Money::parse("10.", 2).unwrap().cents(), 1000);
        assert_eq!(Money::parse("-3.25", 2).unwrap().cents(), -325);
        assert_eq!(Money::parse("7", 0).unwrap().cents(), 7);
        assert_eq!(Money::parse("1.234", 3).unwrap().cents(), 1234);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("", 2).is_err());
        assert!(Money::parse("   ", 2).is_err());
        assert!(Money::parse("-", 2).is_err());
        assert!(Money::parse(".", 2).is_err());
        assert!(Money::parse("abc", 2).is_err());
        assert!(Money::parse("1,000", 2).is_err());
        assert!(Money::parse("1.2.3", 2).is_err());
        assert!(Money::parse("+5", 2).is_err());
        assert!(Money::parse("10.555", 2).is_err());
        assert!(Money::parse("99999999999999999999", 2).is_err());
        assert!(Money::parse("1", 10).is_err());
    }

    #[test]
    fn test_arithmetic_and_ordering() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(300);
        assert_eq!((a + b).cents(), 1300);
        assert_eq!((a - b).cents(), 700);
        assert!(a > b);
        assert!((b - a).is_negative());
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_float_trap_is_avoided() {
        let net = Money::parse("0.3", 2).unwrap();
        let cost = Money::parse("0.1", 2).unwrap() + Money::parse("0.2", 2).unwrap();
        assert!(net >= cost);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: formatting whole cents and parsing back is lossless.
            #[test]
            fn parse_display_agree(cents in -1_000_000_000_i64..1_000_000_000) {
                let m = Money::from_cents(cents);
                prop_assert_eq!(Money::parse(&m.to_string(), 2).unwrap(), m);
            }

            /// Property: formatting at any scale parses back at that scale.
            #[test]
            fn parse_display_agree_at_scale(cents in -1_000_000_000_i64..1_000_000_000, decimals in 0_u8..=4) {
                let m = Money::from_cents(cents);
                prop_assert_eq!(Money::parse(&m.display(decimals).to_string(), decimals).unwrap(), m);
            }

            /// Property: parsing preserves numeric ordering.
            #[test]
            fn parse_preserves_order(a in 0_u32..1_000_000, b in 0_u32..1_000_000) {
                let ma = Money::parse(&format!("{}.{:02}", a / 100, a % 100), 2).unwrap();
                let mb = Money::parse(&format!("{}.{:02}", b / 100, b % 100), 2).unwrap();
                prop_assert_eq!(ma.cmp(&mb), a.cmp(&b));
            }
        }
    }
}
