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
//! │    A tax line landing on x.xx5 rounds up or down depending on luck      │
//! │                                                                         │
//! │  Inverting a total makes it worse:                                      │
//! │    base = total / 1.06 gives a float that may not round-trip            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Integer Percent                          │
//! │    1015 cents × 21 / 100 = 213.15 → 213 cents, every time               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiscalc_core::money::Money;
//!
//! // Create from cents (preferred)
//! let base = Money::from_cents(1099); // 10.99
//!
//! // Percentage shares round per line
//! let vat = base.apply_rate(fiscalc_core::rates::Rate::from_percent(21)); // 2.31
//! assert_eq!(vat.cents(), 231);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! // Text goes through `fiscalc_core::input::parse_amount_cents`.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::rates::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a withholding line subtracts, so intermediate values
///   may be negative even though user-entered amounts never are
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  "1.234,56" ──► parse_amount_cents ──► Money(123456)                    │
/// │                                              │                          │
/// │                  ┌───────────────────────────┤                          │
/// │                  ▼                           ▼                          │
/// │         forward(base)               inverse(total)                      │
/// │                  │                           │                          │
/// │                  └──────────► LineItems ◄────┘                          │
/// │                                  │                                      │
/// │                                  ▼                                      │
/// │                     Display strings (session crate)                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use fiscalc_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion.
    ///
    /// ## Example
    /// ```rust
    /// use fiscalc_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).units(), 10);
    /// assert_eq!(Money::from_cents(-550).units(), -5);
    /// ```
    #[inline]
    pub const fn units(&self) -> i64 {
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

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative amounts to zero.
    ///
    /// User-entered amounts are never negative; the engine applies this at
    /// every entry point instead of reporting an error.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Applies a percentage rate and rounds the result to the nearest cent.
    ///
    /// ## Rounding: Half Away From Zero
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Each tax LINE is rounded on its own:                               │
    /// │                                                                     │
    /// │    1015 × 21% = 213.15  → 213                                       │
    /// │    1050 × 21% = 220.50  → 221   (half goes away from zero)          │
    /// │      -50 × 21% = -10.50 → -11                                       │
    /// │                                                                     │
    /// │  The total is built from the rounded lines, never rounded itself.   │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// `cents × percent / 100` in `i128`, so no intermediate can overflow.
    /// A result beyond the `i64` range saturates.
    ///
    /// ## Example
    /// ```rust
    /// use fiscalc_core::money::Money;
    /// use fiscalc_core::rates::Rate;
    ///
    /// let base = Money::from_cents(1000); // 10.00
    /// let vat = base.apply_rate(Rate::from_percent(21));
    /// assert_eq!(vat.cents(), 210);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let scaled = self.0 as i128 * rate.percent() as i128;
        Money::from_cents(saturate(div_round_half_away(scaled, 100)))
    }
}

// =============================================================================
// Integer Helpers
// =============================================================================

/// Divides `numerator` by a positive `denominator`, rounding half away from zero.
///
/// Works on doubled operands so odd denominators round exactly:
/// `round(n / d) = floor((2n + d) / 2d)` for `n >= 0`.
pub(crate) fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0, "denominator must be positive");
    let magnitude = (2 * numerator.abs() + denominator) / (2 * denominator);
    if numerator < 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Narrows an `i128` to `i64`, saturating at the bounds.
pub(crate) fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money as a plain decimal ("-5.50").
///
/// ## Note
/// This is for debugging and logs. Locale formatting (symbol, grouping,
/// decimal comma) belongs to the session crate.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
