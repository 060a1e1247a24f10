//! # Rational Module
//!
//! Exact fractions for every amount between the bill and the invoices.
//!
//! ## Where Precision Is Lost
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Money ──(exact)──► Rational ──► shares, debits, credits, balances     │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                  exact invoices                         │
//! │                                        │                                │
//! │                          to_money() ◄──┘  ← THE ONLY LOSSY STEP         │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                 Money invoices                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backed by `BigRational`, which keeps itself in lowest terms after every
//! operation, so equality is plain structural equality.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::money::{Money, MONEY_PRECISION};

/// An exact fraction, always in lowest terms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational(BigRational);

impl Rational {
    /// Zero.
    pub fn zero() -> Self {
        Rational(BigRational::zero())
    }

    /// An integer value.
    pub fn from_integer(value: i64) -> Self {
        Rational(BigRational::from_integer(BigInt::from(value)))
    }

    /// `numer / denom`, `None` if `denom` is zero.
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::rational::Rational;
    ///
    /// let half = Rational::new(2, 4).unwrap();
    /// assert_eq!(half.to_string(), "1/2");
    /// assert!(Rational::new(1, 0).is_none());
    /// ```
    pub fn new(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Rational(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    /// `numer / denom` for non-negative integers, `None` if `denom` is zero.
    pub fn ratio(numer: u64, denom: u64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Rational(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Sign as an ordering against zero.
    pub fn sign(&self) -> Ordering {
        self.0.cmp(&BigRational::zero())
    }

    pub fn abs(&self) -> Self {
        Rational(self.0.abs())
    }

    /// Numerator of the reduced fraction.
    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    /// Denominator of the reduced fraction, always positive.
    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    // =========================================================================
    // Conversion to Money
    // =========================================================================

    /// Nearest cent, halves rounded away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::money::Money;
    /// use billsplit_core::rational::Rational;
    ///
    /// let third = Rational::new(100, 3).unwrap();
    /// assert_eq!(third.to_money(), Some(Money::from_cents(3333)));
    ///
    /// let half_cent = Rational::new(1, 200).unwrap();
    /// assert_eq!(half_cent.to_money(), Some(Money::from_cents(1)));
    /// ```
    ///
    /// `None` if the value doesn't fit in a decimal.
    pub fn to_money(&self) -> Option<Money> {
        Self::cents_to_money(self.scaled_to_cents().round())
    }

    /// Rounds up to the next cent (toward +∞).
    pub fn ceil_to_money(&self) -> Option<Money> {
        Self::cents_to_money(self.scaled_to_cents().ceil())
    }

    /// Rounds down to the previous cent (toward −∞).
    pub fn floor_to_money(&self) -> Option<Money> {
        Self::cents_to_money(self.scaled_to_cents().floor())
    }

    fn scaled_to_cents(&self) -> BigRational {
        let factor = num_traits::pow(BigInt::from(10), MONEY_PRECISION as usize);
        &self.0 * BigRational::from_integer(factor)
    }

    fn cents_to_money(cents: BigRational) -> Option<Money> {
        debug_assert!(cents.denom().is_one());
        let cents = cents.to_integer().to_i128()?;
        Decimal::try_from_i128_with_scale(cents, MONEY_PRECISION)
            .ok()
            .map(Money::from_decimal)
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

/// Exact: every decimal is a fraction over a power of ten.
impl From<Money> for Rational {
    fn from(money: Money) -> Self {
        let amount = money.amount();
        let denom = num_traits::pow(BigInt::from(10), amount.scale() as usize);
        Rational(BigRational::new(BigInt::from(amount.mantissa()), denom))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

impl Add for Rational {
    type Output = Rational;

    fn add(self, other: Rational) -> Rational {
        Rational(self.0 + other.0)
    }
}

impl<'a> Add<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, other: &'a Rational) -> Rational {
        Rational(&self.0 + &other.0)
    }
}

impl AddAssign<&Rational> for Rational {
    fn add_assign(&mut self, other: &Rational) {
        self.0 += &other.0;
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, other: Rational) -> Rational {
        Rational(self.0 - other.0)
    }
}

impl<'a> Sub<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, other: &'a Rational) -> Rational {
        Rational(&self.0 - &other.0)
    }
}

impl SubAssign<&Rational> for Rational {
    fn sub_assign(&mut self, other: &Rational) {
        self.0 -= &other.0;
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, other: Rational) -> Rational {
        Rational(self.0 * other.0)
    }
}

impl<'a> Mul<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, other: &'a Rational) -> Rational {
        Rational(&self.0 * &other.0)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item = &'a Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |mut acc, value| {
            acc += value;
            acc
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
