//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Exact Decimal Factors                    │
//! │    Amounts are i64 minor units.                                         │
//! │    Quantities (1.5 hours) and rates (8.25%) are `Decimal`.              │
//! │    Every product is rounded back to whole cents immediately,            │
//! │    half away from zero: 0.5 → 1, 2.5 → 3, -0.5 → -1.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::money::Money;
//!
//! let rate = Money::from_cents(1000);          // $10.00 per hour
//! let base = rate.times(Decimal::new(15, 1));  // 1.5 hours
//! assert_eq!(base.cents(), 1500);
//!
//! let tax = base.percent(Decimal::from(10));
//! assert_eq!(tax.cents(), 150);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds a decimal amount of cents to a whole cent, half away from zero.
///
/// This is the only rounding rule used by the engine. Values beyond the
/// `i64` range saturate instead of wrapping.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::money::round_half_away_from_zero;
///
/// assert_eq!(round_half_away_from_zero(Decimal::new(25, 1)), 3);   // 2.5
/// assert_eq!(round_half_away_from_zero(Decimal::new(24, 1)), 2);   // 2.4
/// assert_eq!(round_half_away_from_zero(Decimal::new(-25, 1)), -3); // -2.5
/// ```
pub fn round_half_away_from_zero(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Multiplies cents by a decimal factor, saturating on overflow.
fn scale(cents: i64, factor: Decimal) -> Decimal {
    Decimal::from(cents)
        .checked_mul(factor)
        .unwrap_or(if (cents < 0) != factor.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// The engine is currency-agnostic: the caller decides what a minor unit is
/// and how it is displayed.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price_cents ──► base ──► net ──► tax ──► line total      │
/// │                                                                         │
/// │  Σ lines ──► subtotal ──► document discount ──► total ──► deposit       │
/// │                                                   │                     │
/// │                                                   └──► balance due      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from an amount in major units ($12.34 → 1234).
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(Decimal::new(15, 0)).cents(), 1500);
    /// assert_eq!(Money::from_major(Decimal::new(12345, 3)).cents(), 1235); // 12.345
    /// ```
    pub fn from_major(value: Decimal) -> Self {
        Money(round_half_away_from_zero(scale(100, value)))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Negative values become zero.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.is_negative() {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies by a (possibly fractional) quantity and rounds to a cent.
    ///
    /// ## User Workflow
    /// ```text
    /// Time entry: 2.25 hours at $85.00
    ///      │
    ///      ▼
    /// times(2.25) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line base: $191.25
    /// ```
    pub fn times(&self, quantity: Decimal) -> Money {
        Money(round_half_away_from_zero(scale(self.0, quantity)))
    }

    /// Returns `percent`% of this amount, rounded to a cent.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// let net = Money::from_cents(1000);
    /// // 8.25% of $10.00 = 82.5 cents → 83
    /// assert_eq!(net.percent(Decimal::new(825, 2)).cents(), 83);
    /// ```
    pub fn percent(&self, percent: Decimal) -> Money {
        Money(round_half_away_from_zero(scale(self.0, percent) / ONE_HUNDRED))
    }

    /// Extracts the tax contained in a tax-inclusive amount.
    ///
    /// `gross × rate / (100 + rate)`, rounded to a cent.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// let gross = Money::from_cents(1100); // $11.00 including 10%
    /// assert_eq!(gross.included_tax(Decimal::from(10)).cents(), 100);
    /// ```
    pub fn included_tax(&self, rate_percent: Decimal) -> Money {
        let divisor = ONE_HUNDRED + rate_percent;
        if divisor.is_zero() {
            return Money::zero();
        }
        Money(round_half_away_from_zero(scale(self.0, rate_percent) / divisor))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation for logs and debugging.
///
/// ## Note
/// Real display formatting belongs to the caller, which knows the currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds, matching `round_half_away_from_zero`.

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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
