//! # Input Module
//!
//! Turns the raw text of the calculator's fields into numbers.
//!
//! ## Parsing Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Parsing Modes                                  │
//! │                                                                         │
//! │  Lenient (default, live typing)                                         │
//! │  ├── "12,50" ──► 12.50        comma is a decimal separator              │
//! │  ├── "abc"   ──► 0            garbage degrades to zero                  │
//! │  ├── "-5"    ──► 0            amounts are clamped at zero               │
//! │  └── "21.9"  ──► 21           percentages are floored                   │
//! │                                                                         │
//! │  Strict (opt-in, try_* functions)                                       │
//! │  └── same rules, but every normalisation becomes a ValidationError      │
//! │                                                                         │
//! │  Both go through rust_decimal: no binary float ever touches an amount  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiscalc_core::input::{parse_amount_cents, parse_percent};
//!
//! assert_eq!(parse_amount_cents("12,50").cents(), 1250);
//! assert_eq!(parse_amount_cents("12.50").cents(), 1250);
//! assert_eq!(parse_percent("21.9"), 21);
//! ```

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_PERCENT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Decimal Text
// =============================================================================

/// Parses decimal text, treating the first `,` as the decimal separator.
///
/// Empty (or all-whitespace) text is zero. Scientific notation (`1e3`) is
/// accepted; digit separators (`1_000`) are not. A well-formed number too
/// large for `Decimal` comes back as `Decimal::MAX` (or `MIN`) so the
/// callers' clamps apply; one too small comes back as zero. Returns `None`
/// for anything that is not a finite number.
fn normalize_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    if trimmed.contains('_') {
        return None;
    }

    let normalized = trimmed.replacen(',', ".", 1);
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
        .or_else(|| beyond_precision(&normalized))
}

/// Maps numeric text that `Decimal` cannot hold to its nearest bound.
///
/// Only plain `[+-]digits[.digits][e[+-]digits]` text qualifies.
fn beyond_precision(text: &str) -> Option<Decimal> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
        Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i32>().ok()?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    // Decimal position of the leading significant digit.
    let significant_whole = whole.trim_start_matches('0').len() as i64;
    let magnitude = if significant_whole > 0 {
        significant_whole + exponent as i64
    } else {
        let significant_fraction = fraction.trim_start_matches('0');
        if significant_fraction.is_empty() {
            return Some(Decimal::ZERO);
        }
        exponent as i64 - (fraction.len() - significant_fraction.len()) as i64
    };

    if magnitude > 0 {
        Some(if negative { Decimal::MIN } else { Decimal::MAX })
    } else {
        Some(Decimal::ZERO)
    }
}

/// Parses decimal text leniently; unparsable text is zero.
///
/// ## Example
/// ```rust
/// use fiscalc_core::input::parse_decimal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal("12,5"), Decimal::new(125, 1));
/// assert_eq!(parse_decimal("not a number"), Decimal::ZERO);
/// ```
pub fn parse_decimal(text: &str) -> Decimal {
    normalize_decimal(text).unwrap_or(Decimal::ZERO)
}

/// Parses decimal text, reporting unparsable text as an error.
pub fn try_parse_decimal(field: &str, text: &str) -> ValidationResult<Decimal> {
    normalize_decimal(text).ok_or_else(|| ValidationError::InvalidNumber {
        field: field.to_string(),
        text: text.trim().to_string(),
    })
}

// =============================================================================
// Amounts
// =============================================================================

/// Converts a decimal amount to cents.
///
/// Rounds to two decimals (half away from zero), then clamps to
/// `0..=MAX_AMOUNT_CENTS`.
fn decimal_to_cents(value: Decimal) -> Money {
    let ceiling = Decimal::new(MAX_AMOUNT_CENTS, 2);
    let clamped = value.max(Decimal::ZERO).min(ceiling);
    let rounded = clamped.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let cents = (rounded * Decimal::ONE_HUNDRED).to_i64().unwrap_or(0);
    Money::from_cents(cents)
}

/// Parses an amount field leniently.
///
/// ## Rules
/// - Comma or dot decimal separator
/// - Unparsable text ⇒ 0
/// - Negative ⇒ 0
/// - More than two decimals ⇒ rounded to the cent
///
/// ## Example
/// ```rust
/// use fiscalc_core::input::parse_amount_cents;
///
/// assert_eq!(parse_amount_cents("1000").cents(), 100_000);
/// assert_eq!(parse_amount_cents("-3").cents(), 0);
/// assert_eq!(parse_amount_cents("0,005").cents(), 1);
/// ```
pub fn parse_amount_cents(text: &str) -> Money {
    decimal_to_cents(parse_decimal(text))
}

/// Parses an amount field strictly.
///
/// ## Errors
/// - `InvalidNumber` for unparsable text
/// - `Negative` for amounts below zero
/// - `OutOfRange` above `MAX_AMOUNT_CENTS`
pub fn try_parse_amount_cents(field: &str, text: &str) -> ValidationResult<Money> {
    let value = try_parse_decimal(field, text)?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if value > Decimal::new(MAX_AMOUNT_CENTS, 2) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS / 100,
        });
    }

    Ok(decimal_to_cents(value))
}

// =============================================================================
// Percentages
// =============================================================================

/// Parses a percentage field leniently into whole percent.
///
/// ## Rules
/// - Unparsable text ⇒ 0
/// - Fractional part is floored (`"21.9"` ⇒ 21)
/// - Clamped to `0..=MAX_PERCENT`
pub fn parse_percent(text: &str) -> u32 {
    let floored = parse_decimal(text).floor();
    floored
        .max(Decimal::ZERO)
        .min(Decimal::from(MAX_PERCENT))
        .to_u32()
        .unwrap_or(0)
}

/// Parses a percentage field strictly.
///
/// ## Errors
/// - `InvalidNumber` for unparsable text
/// - `FractionalPercent` when the value is not whole
/// - `OutOfRange` outside `0..=MAX_PERCENT`
pub fn try_parse_percent(field: &str, text: &str) -> ValidationResult<u32> {
    let value = try_parse_decimal(field, text)?;

    if value.fract() != Decimal::ZERO {
        return Err(ValidationError::FractionalPercent {
            field: field.to_string(),
            text: text.trim().to_string(),
        });
    }

    if value < Decimal::ZERO || value > Decimal::from(MAX_PERCENT) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PERCENT as i64,
        });
    }

    Ok(value.to_u32().unwrap_or(0))
}

// =============================================================================
// Unit Tests
// =============================================================================
