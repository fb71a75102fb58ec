//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    Math.round(x * 100) / 100 papers over it, sometimes                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹320.00 = 32000 paise, ₹31.00 tax = 3100 paise                       │
//! │    Every sum is exact; the ONLY rounding step is tax                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use platter_core::money::Money;
//!
//! let price = Money::from_major(320);          // ₹320.00
//! let line = price.multiply_quantity(2);       // ₹640.00
//! let total = line + Money::from_cents(5000);  // ₹690.00
//! assert_eq!(total.cents(), 69_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Where Money is Used
/// ```text
/// Dish.price_cents ──► OrderLine.unit_price ──► line total (× qty)
///                                                    │
///                                                    ▼
///              OrderTotals { subtotal, tax, delivery_fee, grand_total }
/// ```
///
/// Serializes as a bare integer count of paise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use platter_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // ₹10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// Menu prices are whole rupees, so this is what seeding and tests use.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use platter_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax, rounding half away from zero to the nearest paisa.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF AWAY FROM ZERO                                          │
    /// │                                                                     │
    /// │  ₹10.01 × 5% = ₹0.5005  → ₹0.50                                     │
    /// │  ₹10.10 × 5% = ₹0.505   → ₹0.51  (half goes up for positives)       │
    /// │                                                                     │
    /// │  Same result as Math.round(x * 100) / 100 on positive amounts,     │
    /// │  computed without floats: (paise × bps + 5000) / 10000             │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use platter_core::money::Money;
    /// use platter_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_major(620);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(500));
    /// assert_eq!(tax, Money::from_major(31));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large subtotals times bps cannot overflow
        let scaled = self.0 as i128 * rate.bps() as i128;
        let rounded = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use platter_core::money::Money;
    ///
    /// let line_total = Money::from_major(150).multiply_quantity(2);
    /// assert_eq!(line_total, Money::from_major(300));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `self - other`, floored at zero.
    #[inline]
    pub fn saturating_sub_to_zero(self, other: Money) -> Money {
        if self.0 > other.0 {
            Money(self.0 - other.0)
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable rupee amount, e.g. `₹651.00`.
///
/// For logs and the CLI; the frontend does its own localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.cents_part())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
    fn test_from_cents_and_major() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.cents_part(), 99);

        assert_eq!(Money::from_major(320).cents(), 32_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(65_100)), "₹651.00");
        assert_eq!(format!("{}", Money::from_cents(505)), "₹5.05");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_tax_whole_rupees() {
        let rate = TaxRate::from_bps(500);
        assert_eq!(Money::from_major(40).calculate_tax(rate), Money::from_major(2));
        assert_eq!(Money::from_major(500).calculate_tax(rate), Money::from_major(25));
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        let rate = TaxRate::from_bps(500);
        // ₹10.10 × 5% = 50.5 paise → 51
        assert_eq!(Money::from_cents(1010).calculate_tax(rate).cents(), 51);
        // ₹10.01 × 5% = 50.05 paise → 50
        assert_eq!(Money::from_cents(1001).calculate_tax(rate).cents(), 50);
        // Negative amounts mirror positive ones
        assert_eq!(Money::from_cents(-1010).calculate_tax(rate).cents(), -51);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_saturating_sub_to_zero() {
        let a = Money::from_major(500);
        assert_eq!(a.saturating_sub_to_zero(Money::from_major(120)), Money::from_major(380));
        assert_eq!(a.saturating_sub_to_zero(Money::from_major(600)), Money::zero());
    }
}
