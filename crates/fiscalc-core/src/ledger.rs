//! # Ledger Module
//!
//! The calculation engine: base ⇄ total under per-line cent rounding.
//!
//! ## Two Directions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  forward(base)                                                          │
//! │    additive    = round(base × additive%)                                │
//! │    subtractive = round(base × subtractive%)                             │
//! │    total       = base + additive − subtractive                          │
//! │                                                                         │
//! │  inverse(total)                                                         │
//! │    factor = 1 + additive% − subtractive%        (≤ 0 ⇒ NotInvertible)   │
//! │    guess  = round(total / factor)                                       │
//! │    try guess, guess+1, guess−1, guess+2, guess−2 … ±500                 │
//! │    first base whose forward total == total wins (exact)                 │
//! │    none? ⇒ guess, flagged approximate                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Search?
//! Each line is rounded on its own, so `forward` is a staircase, not a line.
//! Several bases can share a total and some totals are never reached:
//!
//! ```text
//! VAT 21%:  base 2 ──► total 2
//!           base 3 ──► total 4      (total 3 is unreachable)
//! ```
//!
//! Dividing by the factor lands within a few cents of a solution; the
//! bounded walk finds it.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use ts_rs::TS;

use crate::error::{LedgerError, NotInvertibleReason};
use crate::money::{div_round_half_away, saturate, Money};
use crate::rates::RateConfig;
use crate::{MAX_AMOUNT_CENTS, SEARCH_RADIUS_CENTS};

/// Largest estimate the inverse search starts from.
///
/// At `MAX_PERCENT` a base this size still has every line and total well
/// inside `i64`.
pub const MAX_SEARCH_BASE_CENTS: i64 = MAX_AMOUNT_CENTS * 100;

// =============================================================================
// Line Items
// =============================================================================

/// The result of a ledger computation.
///
/// ## Invariant
/// `total == base + additive_amount - subtractive_amount`, exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItems {
    /// Pre-tax amount.
    pub base: Money,
    /// Tax added on top of the base.
    pub additive_amount: Money,
    /// Tax withheld from the total.
    pub subtractive_amount: Money,
    /// Final amount.
    pub total: Money,
}

impl LineItems {
    /// Checks the line invariant.
    pub fn is_balanced(&self) -> bool {
        self.total.cents() as i128
            == self.base.cents() as i128 + self.additive_amount.cents() as i128
                - self.subtractive_amount.cents() as i128
    }
}

/// Computes the line items for a base amount.
///
/// Negative bases are treated as zero. Lines and total saturate at the
/// `i64` bounds instead of overflowing; below `MAX_SEARCH_BASE_CENTS` they
/// never get there.
///
/// ## Example
/// ```rust
/// use fiscalc_core::ledger::forward;
/// use fiscalc_core::money::Money;
/// use fiscalc_core::rates::RateConfig;
///
/// let items = forward(Money::from_cents(1000), RateConfig::from_percents(21, 15));
/// assert_eq!(items.additive_amount.cents(), 210);
/// assert_eq!(items.subtractive_amount.cents(), 150);
/// assert_eq!(items.total.cents(), 1060);
/// ```
pub fn forward(base: Money, rates: RateConfig) -> LineItems {
    let base = base.clamp_non_negative();
    let additive_amount = base.apply_rate(rates.additive);
    let subtractive_amount = base.apply_rate(rates.subtractive);

    let total = base.cents() as i128 + additive_amount.cents() as i128
        - subtractive_amount.cents() as i128;

    LineItems {
        base,
        additive_amount,
        subtractive_amount,
        total: Money::from_cents(saturate(total)),
    }
}

// =============================================================================
// Inversion
// =============================================================================

/// A base recovered from a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Inversion {
    /// The recovered base.
    pub base: Money,
    /// Whether `forward(base).total` reproduces the requested total.
    pub exact: bool,
    /// How many forward evaluations the search needed (at most 1001).
    pub evaluations: u32,
}

/// Recovers a base amount from a total.
///
/// ## Errors
/// `LedgerError::NotInvertible` with reason `Factor` when
/// `1 + additive - subtractive <= 0`.
///
/// ## Approximate Results
/// A total that no base reaches within `±SEARCH_RADIUS_CENTS` of the
/// estimate yields the estimate itself with `exact: false`. Negative
/// totals are clamped to zero first, and the estimate is capped at
/// `MAX_SEARCH_BASE_CENTS`.
///
/// ## Example
/// ```rust
/// use fiscalc_core::ledger::inverse;
/// use fiscalc_core::money::Money;
/// use fiscalc_core::rates::RateConfig;
///
/// let found = inverse(Money::from_cents(1060), RateConfig::from_percents(21, 15)).unwrap();
/// assert_eq!(found.base.cents(), 1000);
/// assert!(found.exact);
/// ```
pub fn inverse(total: Money, rates: RateConfig) -> Result<Inversion, LedgerError> {
    let factor_percent = rates.factor_percent();
    if factor_percent <= 0 {
        warn!(
            factor_percent,
            additive = rates.additive.percent(),
            subtractive = rates.subtractive.percent(),
            "Ledger cannot be inverted"
        );
        return Err(LedgerError::NotInvertible {
            reason: NotInvertibleReason::Factor,
            factor_percent,
        });
    }

    let target = total.clamp_non_negative();
    let estimate = div_round_half_away(target.cents() as i128 * 100, factor_percent as i128);
    let guess = Money::from_cents(saturate(estimate.clamp(0, MAX_SEARCH_BASE_CENTS as i128)));

    let reaches = |candidate: Money| forward(candidate, rates).total == target;

    let mut evaluations = 1u32;
    if reaches(guess) {
        trace!(total = %target, base = %guess, "Estimate is exact");
        return Ok(Inversion {
            base: guess,
            exact: true,
            evaluations,
        });
    }

    for offset in 1..=SEARCH_RADIUS_CENTS {
        let above = Money::from_cents(guess.cents().saturating_add(offset));
        evaluations += 1;
        if reaches(above) {
            debug!(total = %target, base = %above, offset, "Found base above estimate");
            return Ok(Inversion {
                base: above,
                exact: true,
                evaluations,
            });
        }

        let below = Money::from_cents(guess.cents() - offset);
        if below.is_negative() {
            continue;
        }
        evaluations += 1;
        if reaches(below) {
            debug!(total = %target, base = %below, offset, "Found base below estimate");
            return Ok(Inversion {
                base: below,
                exact: true,
                evaluations,
            });
        }
    }

    warn!(
        total = %target,
        estimate = %guess,
        evaluations,
        "No base reproduces total; returning approximate base"
    );
    Ok(Inversion {
        base: guess,
        exact: false,
        evaluations,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
