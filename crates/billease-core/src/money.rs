//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Amounts arrive over JSON as floats:                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing a month of transactions in f64 drifts by paise.               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹10.10 → 1010 paise, summed exactly                                 │
//! │    Converted back to rupees only at the JSON edge                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billease_core::money::Money;
//!
//! let salary = Money::from_rupees(25_000.50);
//! assert_eq!(salary.paise(), 2_500_050);
//!
//! let total = salary + Money::from_paise(50);
//! assert_eq!(total.to_rupees(), 25_001.0);
//! ```
//!
//! ## Overflow
//! Arithmetic saturates at `i64::MIN`/`i64::MAX` paise. Validated
//! amounts stay far below that bound; rows written through the raw SQL
//! interpreter may not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 of a rupee).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  transactions.amount ──► Money ──► summary totals ──► f64 in JSON      │
/// │                                                                         │
/// │  employees.basic_salary ──► Money ──► PF / ESI / TDS ──► payslip        │
/// │                                                                         │
/// │  crm_leads.value ──► Money ──► pipeline value                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Rows still store rupees as JSON numbers (the frontend reads them
/// directly); `Money` is the arithmetic type between reading a row and
/// writing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Converts a rupee amount (as stored in rows) to paise, rounding to
    /// the nearest paisa. Non-finite input is treated as zero; amounts
    /// past the paise range clamp to it.
    ///
    /// ## Example
    /// ```rust
    /// use billease_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(10.99).paise(), 1099);
    /// assert_eq!(Money::from_rupees(0.1 + 0.2).paise(), 30);
    /// assert_eq!(Money::from_rupees(f64::NAN).paise(), 0);
    /// assert_eq!(Money::from_rupees(1e300).paise(), i64::MAX);
    /// ```
    pub fn from_rupees(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        // float-to-int `as` saturates
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the value in rupees, for JSON output.
    #[inline]
    pub fn to_rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whole rupees portion.
    #[inline]
    pub const fn rupees_part(&self) -> i64 {
        self.0 / 100
    }

    /// Paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

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

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Clamps negative amounts to zero.
    #[inline]
    pub const fn floor_zero(self) -> Money {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Applies a percentage rate, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, in i128 so large
    /// annual figures cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use billease_core::money::Money;
    /// use billease_core::types::Rate;
    ///
    /// let basic = Money::from_rupees(15_000.0);
    /// let pf = basic.percent(Rate::from_percentage(12.0));
    /// assert_eq!(pf.to_rupees(), 1_800.0);
    /// ```
    pub fn percent(&self, rate: Rate) -> Money {
        let paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(paise.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Divides evenly, rounding half up (used for monthly shares of
    /// annual amounts).
    pub fn divide_by(&self, parts: i64) -> Money {
        if parts == 0 {
            return Money::zero();
        }
        let half = parts / 2;
        Money(self.0.saturating_add(half).saturating_div(parts))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rupee rendering; the frontend formats for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees_part().abs(),
            self.paise_part()
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees_rounds_to_paise() {
        assert_eq!(Money::from_rupees(10.99).paise(), 1099);
        assert_eq!(Money::from_rupees(0.005).paise(), 1);
        assert_eq!(Money::from_rupees(-5.5).paise(), -550);
        assert_eq!(Money::from_rupees(f64::INFINITY).paise(), 0);
    }

    #[test]
    fn test_float_drift_is_absorbed() {
        let total: Money = [0.1, 0.2, 0.3]
            .iter()
            .map(|r| Money::from_rupees(*r))
            .sum();
        assert_eq!(total.paise(), 60);
        assert_eq!(total.to_rupees(), 0.6);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_percent() {
        let amount = Money::from_rupees(20_000.0);
        assert_eq!(amount.percent(Rate::from_percentage(0.75)).to_rupees(), 150.0);
        assert_eq!(amount.percent(Rate::from_percentage(1.75)).to_rupees(), 350.0);
    }

    #[test]
    fn test_min_and_floor() {
        let a = Money::from_paise(100);
        let b = Money::from_paise(-200);
        assert_eq!(a.min(b), b);
        assert_eq!(b.floor_zero(), Money::zero());
        assert_eq!(a.floor_zero(), a);
    }

    #[test]
    fn test_divide_by_rounds_half_up() {
        assert_eq!(Money::from_paise(100).divide_by(12).paise(), 8);
        assert_eq!(Money::from_paise(18).divide_by(12).paise(), 2);
        assert_eq!(Money::from_paise(5).divide_by(0).paise(), 0);
        assert_eq!(Money::from_paise(i64::MAX).divide_by(2).paise(), i64::MAX / 2);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = Money::from_rupees(1e17);
        assert_eq!(huge.paise(), i64::MAX);

        let total: Money = [huge, huge, Money::from_rupees(5.0)].into_iter().sum();
        assert_eq!(total.paise(), i64::MAX);
        assert_eq!((Money::from_paise(i64::MIN) - Money::from_paise(1)).paise(), i64::MIN);
        assert_eq!((huge * 3).paise(), i64::MAX);

        let mut acc = huge;
        acc += huge;
        assert_eq!(acc.paise(), i64::MAX);
        acc -= Money::from_paise(i64::MIN);
        assert_eq!(acc.paise(), i64::MAX);

        assert_eq!(huge.percent(Rate::from_bps(20_000)).paise(), i64::MAX);
    }
}
