//! # Money Module
//!
//! Provides the `Money` type for every externally visible amount.
//!
//! ## Why Two Number Types?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE SPLITTING PROBLEM                                                  │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In fixed two-digit decimals:                                           │
//! │    100.00 / 3 = 33.33 (×3 = 99.99)  → Lost 0.01!                       │
//! │                                                                         │
//! │  OUR SOLUTION                                                           │
//! │    Money    - decimal, 2 digits, what users see and what is stored     │
//! │    Rational - exact fraction, everything computed in between           │
//! │    100/3 stays 100/3 until the very end, then the lost cent is         │
//! │    handed out explicitly by the rounding corrector                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billsplit_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//!
//! let doubled = price.checked_multiply_quantity(2); // Some(21.98)
//! let total = price + Money::from_cents(500);        // 15.99
//! assert_eq!(doubled, Some(Money::from_cents(2198)));
//! assert_eq!(total.to_string(), "15.99");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Number of fractional digits a valid amount may carry.
pub const MONEY_PRECISION: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A decimal amount constrained to two fractional digits.
///
/// ## Design Decisions
/// - **Decimal, not cents**: amounts arrive from the wire as decimals and
///   may carry too many digits. Keeping the raw decimal lets validation
///   report exactly what was sent instead of silently truncating it.
/// - **Signed**: balances and rounding fixes can be negative.
/// - **Serialized as a string** with exactly two digits (`"10.00"`).
///
/// A `Money` built from arbitrary input is not guaranteed to be valid; call
/// [`Money::has_valid_precision`] (bill validation does this for you).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal as-is. Precision is checked later by validation.
    #[inline]
    pub const fn from_decimal(value: Decimal) -> Self {
        Money(value)
    }

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_PRECISION))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// The smallest representable step (0.01).
    #[inline]
    pub fn cent() -> Self {
        Money::from_cents(1)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Checks if the value is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `true` if the amount has at most two fractional digits.
    ///
    /// Trailing zeros don't count: `1.500` is valid, `1.005` is not.
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(Money::from_decimal(Decimal::new(1500, 3)).has_valid_precision());
    /// assert!(!Money::from_decimal(Decimal::new(1005, 3)).has_valid_precision());
    /// ```
    pub fn has_valid_precision(&self) -> bool {
        self.0.normalize().scale() <= MONEY_PRECISION
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// A product that only fits by dropping fractional digits counts as an
    /// overflow too.
    pub fn checked_multiply_quantity(&self, qty: u32) -> Option<Self> {
        let price = self.0.normalize();
        exact(price.checked_mul(Decimal::from(qty)), price.scale())
    }

    /// Adds two amounts, `None` on overflow.
    ///
    /// Near the top of the decimal range `rust_decimal` keeps going by
    /// rounding away low digits; that loss is reported as `None` here.
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        let (a, b) = (self.0.normalize(), other.0.normalize());
        exact(a.checked_add(b), a.scale().max(b.scale()))
    }

    /// Divides by `parts` and drops everything past the last cent, toward zero.
    ///
    /// Used to size the per-invoice rounding fix. `parts` must be non-zero.
    pub(crate) fn split_truncated(&self, parts: usize) -> Self {
        let share = self.0 / Decimal::from(parts);
        Money(share.round_dp_with_strategy(MONEY_PRECISION, RoundingStrategy::ToZero))
    }
}

/// Keeps a checked result only if it still carries `scale` fractional digits.
fn exact(result: Option<Decimal>, scale: u32) -> Option<Money> {
    result.filter(|value| value.scale() >= scale).map(Money)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Always two fractional digits, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(MONEY_PRECISION);
        write!(f, "{}", value)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts a string or a number. Strings are preferred: a JSON number goes
/// through `f64` and can pick up digits nobody typed.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Money)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
        assert_eq!(Money::from_cents(-550).amount(), dec!(-5.50));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_decimal(dec!(5)).to_string(), "5.00");
        assert_eq!(Money::from_decimal(dec!(5.5)).to_string(), "5.50");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Money::from_decimal(dec!(1.5)), Money::from_decimal(dec!(1.50)));
        assert_eq!(Money::from_decimal(dec!(3)), Money::from_cents(300));
    }

    #[test]
    fn test_precision() {
        assert!(Money::from_decimal(dec!(10)).has_valid_precision());
        assert!(Money::from_decimal(dec!(10.1)).has_valid_precision());
        assert!(Money::from_decimal(dec!(10.12)).has_valid_precision());
        assert!(Money::from_decimal(dec!(10.120)).has_valid_precision());
        assert!(!Money::from_decimal(dec!(10.125)).has_valid_precision());
        assert!(!Money::from_decimal(dec!(-0.001)).has_valid_precision());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(b - a, Money::from_cents(-500));
        assert_eq!(-a, Money::from_cents(-1000));

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total, Money::from_cents(2000));
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::from_decimal(Decimal::MAX);
        assert!(max.checked_add(Money::cent()).is_none());
        assert!(max.checked_multiply_quantity(2).is_none());
        assert_eq!(
            Money::from_cents(299).checked_multiply_quantity(3),
            Some(Money::from_cents(897))
        );
        assert_eq!(
            Money::from_cents(150).checked_add(Money::from_decimal(dec!(0.500))),
            Some(Money::from_cents(200))
        );
    }

    #[test]
    fn test_checked_arithmetic_keeps_cents() {
        // Largest mantissa at two digits: 792281625142643375935439503.35
        let mut near_max = Decimal::MAX;
        near_max.set_scale(2).unwrap();
        let near_max = Money::from_decimal(near_max);

        assert!(near_max.checked_add(Money::cent()).is_none());
        assert!(near_max.checked_add(Money::from_cents(-1)).is_some());
        assert!(near_max.checked_multiply_quantity(1).is_some());
        assert!(near_max.checked_multiply_quantity(2).is_none());

        // Trailing zeros don't eat into the range
        let padded = Money::from_decimal(dec!(1.0000000000000000000000000000));
        assert_eq!(
            padded.checked_add(Money::from_cents(10_000_000)),
            Some(Money::from_cents(10_000_100))
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
        assert_eq!(Money::from_cents(-100).abs(), Money::from_cents(100));
    }

    #[test]
    fn test_split_truncated() {
        assert_eq!(Money::from_cents(1).split_truncated(3), Money::zero());
        assert_eq!(Money::from_cents(5).split_truncated(3), Money::from_cents(1));
        assert_eq!(Money::from_cents(10).split_truncated(3), Money::from_cents(3));
        assert_eq!(Money::from_cents(-5).split_truncated(2), Money::from_cents(-2));
    }

    #[test]
    fn test_serde_roundtrip_uses_two_digits() {
        let json = serde_json::to_string(&Money::from_decimal(dec!(5))).unwrap();
        assert_eq!(json, "\"5.00\"");

        let parsed: Money = serde_json::from_str("\"33.34\"").unwrap();
        assert_eq!(parsed, Money::from_cents(3334));
    }

    #[test]
    fn test_deserialize_json_number() {
        let parsed: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(parsed, Money::from_cents(1050));
        assert_eq!(parsed.to_string(), "10.50");

        let parsed: Money = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, Money::from_cents(700));

        assert!(serde_json::from_str::<Money>("\"ten\"").is_err());
    }

    /// 10.00 split three ways in two-digit decimals loses a cent. This is the
    /// loss the rest of the engine exists to avoid.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_cents(1000);
        let one_third = ten.split_truncated(3);
        assert_eq!(one_third, Money::from_cents(333));
        assert_eq!(ten - (one_third + one_third + one_third), Money::cent());
    }
}
