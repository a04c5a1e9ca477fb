//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalog API stores prices as floats:                               │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (kobo)                               │
//! │    Floats are converted exactly once, at the HTTP boundary,            │
//! │    and every cart total is computed on integers.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::from_minor(150_050); // ₦1,500.50
//! let line = price * 2;
//! assert_eq!(line.minor(), 300_100);
//! assert_eq!(line.to_string(), "₦3,001.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Currency symbol used when rendering amounts.
pub const CURRENCY_SYMBOL: &str = "₦";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (kobo for NGN).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction is total, validation rejects negative prices
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating arithmetic**: totals clamp at `i64::MAX` instead of panicking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from a whole number of major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(100))
    }

    /// Converts a decimal major-unit amount as sent by the REST API.
    ///
    /// This is the ONLY place floats enter the system. The value is rounded
    /// to the nearest minor unit.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_f64(10.99).minor(), 1099);
    /// assert_eq!(Money::from_major_f64(0.1 + 0.2).minor(), 30);
    /// ```
    pub fn from_major_f64(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Converts back to a decimal major-unit amount for the wire.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (naira) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a cart quantity, saturating on overflow.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as `₦1,234.50`, grouping the major part in thousands.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.major().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            grouped,
            self.minor_part()
        )
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by a cart quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_minor(1099).to_string(), "₦10.99");
        assert_eq!(Money::from_major(1500).to_string(), "₦1,500.00");
        assert_eq!(Money::from_minor(123_456_789).to_string(), "₦1,234,567.89");
        assert_eq!(Money::from_minor(-550).to_string(), "-₦5.50");
        assert_eq!(Money::zero().to_string(), "₦0.00");
    }

    #[test]
    fn test_float_boundary_rounds() {
        assert_eq!(Money::from_major_f64(2500.0).minor(), 250_000);
        assert_eq!(Money::from_major_f64(19.999).minor(), 2000);
        assert_eq!(Money::from_minor(1099).to_major_f64(), 10.99);
    }

    #[test]
    fn test_sum_and_quantity() {
        let total: Money = [Money::from_minor(1000) * 2, Money::from_minor(500) * 3]
            .into_iter()
            .sum();
        assert_eq!(total.minor(), 3500);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_minor(100_000_000_000);
        assert_eq!(huge.multiply_quantity(1_000_000_000).minor(), i64::MAX);
        assert_eq!((Money::from_minor(i64::MAX) + Money::from_minor(1)).minor(), i64::MAX);

        let total: Money = [Money::from_minor(i64::MAX), Money::from_minor(i64::MAX)]
            .into_iter()
            .sum();
        assert_eq!(total.minor(), i64::MAX);
        assert_eq!(Money::from_major(i64::MAX).minor(), i64::MAX);
    }
}
