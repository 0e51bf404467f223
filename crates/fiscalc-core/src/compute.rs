//! # Compute Module
//!
//! Direction-aware orchestration: one call per field edit.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CalculatorInput (explicit context, nothing ambient)                    │
//! │    base text, total text, two percent texts, two toggles, last edited   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  RateConfig::resolve ──► rates                                          │
//! │         │                                                               │
//! │         ├── last edited = Base  ──► forward(base)                       │
//! │         │                               └──► write back total           │
//! │         │                                                               │
//! │         └── last edited = Total ──► inverse(total)                      │
//! │                                         ├──► Ok  ──► forward(base)      │
//! │                                         │             └──► write back   │
//! │                                         │                  base         │
//! │                                         └──► Err ──► Unresolved         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine keeps no state between calls. Guarding the write-back against
//! re-triggering an edit is the caller's job (see `fiscalc-session`).

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, LedgerError, NotInvertibleReason};
use crate::input::parse_amount_cents;
use crate::ledger::{forward, inverse, LineItems};
use crate::money::Money;
use crate::rates::RateConfig;

// =============================================================================
// Edit Direction
// =============================================================================

/// Which amount field the user edited last, and is therefore authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EditDirection {
    /// The base was typed; the total is derived.
    #[default]
    Base,
    /// The total was typed; the base is solved for.
    Total,
}

impl EditDirection {
    /// The field that receives the derived value.
    pub const fn opposite(&self) -> Self {
        match self {
            EditDirection::Base => EditDirection::Total,
            EditDirection::Total => EditDirection::Base,
        }
    }
}

// =============================================================================
// Calculator Input
// =============================================================================

/// Everything one computation needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInput {
    /// Raw text of the base field.
    pub base_text: String,
    /// Raw text of the total field.
    pub total_text: String,
    /// Raw text of the additive percentage field.
    pub additive_percent_text: String,
    /// Raw text of the subtractive percentage field.
    pub subtractive_percent_text: String,
    /// Whether the additive tax applies.
    pub additive_enabled: bool,
    /// Whether the subtractive tax applies.
    pub subtractive_enabled: bool,
    /// Authoritative field.
    pub last_edited: EditDirection,
}

impl Default for CalculatorInput {
    /// VAT on, withholding off, nothing typed yet.
    fn default() -> Self {
        CalculatorInput {
            base_text: String::new(),
            total_text: String::new(),
            additive_percent_text: String::new(),
            subtractive_percent_text: String::new(),
            additive_enabled: true,
            subtractive_enabled: false,
            last_edited: EditDirection::Base,
        }
    }
}

impl CalculatorInput {
    /// Resolves the two rates from their text and toggles.
    pub fn rates(&self) -> RateConfig {
        RateConfig::resolve(
            &self.additive_percent_text,
            self.additive_enabled,
            &self.subtractive_percent_text,
            self.subtractive_enabled,
        )
    }
}

// =============================================================================
// Computation Result
// =============================================================================

/// The derived value to write into the non-authoritative amount field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WriteBack {
    /// The field to write into.
    pub field: EditDirection,
    /// The value to write.
    pub amount: Money,
}

/// A computation that produced numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    /// Authoritative field for this computation.
    pub direction: EditDirection,
    /// Rates that were applied.
    pub rates: RateConfig,
    /// Balanced line items.
    pub items: LineItems,
    /// False when no base reproduces the typed total; `items` then holds the
    /// closest base and its own (balanced) total.
    pub exact: bool,
    /// Value for the opposite amount field.
    pub write_back: WriteBack,
    /// Whether the additive line should be shown.
    pub show_additive: bool,
    /// Whether the subtractive line should be shown.
    pub show_subtractive: bool,
}

/// A computation whose base cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Unresolved {
    /// Rates that were applied.
    pub rates: RateConfig,
    /// The total as typed (clamped at zero).
    pub total: Money,
    /// Why no base exists.
    pub reason: NotInvertibleReason,
    /// Factor that made the ledger degenerate, in whole percent.
    pub factor_percent: i64,
}

/// Outcome of one computation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Computation {
    /// Numbers are available for every line.
    Resolved(Resolved),
    /// The host must render placeholders for base and tax lines.
    Unresolved(Unresolved),
}

impl Computation {
    fn resolved(direction: EditDirection, rates: RateConfig, items: LineItems, exact: bool) -> Self {
        let amount = match direction {
            EditDirection::Base => items.total,
            EditDirection::Total => items.base,
        };

        Computation::Resolved(Resolved {
            direction,
            rates,
            items,
            exact,
            write_back: WriteBack {
                field: direction.opposite(),
                amount,
            },
            show_additive: !items.additive_amount.is_zero(),
            show_subtractive: !items.subtractive_amount.is_zero(),
        })
    }

    /// Returns the line items, if resolved.
    pub fn items(&self) -> Option<&LineItems> {
        match self {
            Computation::Resolved(resolved) => Some(&resolved.items),
            Computation::Unresolved(_) => None,
        }
    }

    /// Returns the write-back, if resolved.
    pub fn write_back(&self) -> Option<WriteBack> {
        match self {
            Computation::Resolved(resolved) => Some(resolved.write_back),
            Computation::Unresolved(_) => None,
        }
    }

    /// Checks whether the computation produced numbers.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Computation::Resolved(_))
    }

    /// Converts to a `Result`, turning `Unresolved` into a ledger error.
    ///
    /// ## Usage
    /// ```rust
    /// use fiscalc_core::compute::{compute, CalculatorInput, EditDirection};
    ///
    /// let input = CalculatorInput {
    ///     total_text: "100".to_string(),
    ///     subtractive_percent_text: "100".to_string(),
    ///     additive_enabled: false,
    ///     subtractive_enabled: true,
    ///     last_edited: EditDirection::Total,
    ///     ..CalculatorInput::default()
    /// };
    /// assert!(compute(&input).into_result().is_err());
    /// ```
    pub fn into_result(self) -> CoreResult<Resolved> {
        match self {
            Computation::Resolved(resolved) => Ok(resolved),
            Computation::Unresolved(unresolved) => Err(CoreError::Ledger(LedgerError::NotInvertible {
                reason: unresolved.reason,
                factor_percent: unresolved.factor_percent,
            })),
        }
    }
}

// =============================================================================
// Compute
// =============================================================================

/// Runs one computation cycle for the given input.
///
/// ## Example
/// ```rust
/// use fiscalc_core::compute::{compute, CalculatorInput, EditDirection};
///
/// let input = CalculatorInput {
///     base_text: "10,00".to_string(),
///     additive_percent_text: "21".to_string(),
///     subtractive_percent_text: "15".to_string(),
///     subtractive_enabled: true,
///     ..CalculatorInput::default()
/// };
///
/// let computation = compute(&input);
/// let write_back = computation.write_back().unwrap();
/// assert_eq!(write_back.field, EditDirection::Total);
/// assert_eq!(write_back.amount.cents(), 1060);
/// ```
pub fn compute(input: &CalculatorInput) -> Computation {
    let rates = input.rates();

    match input.last_edited {
        EditDirection::Base => {
            let base = parse_amount_cents(&input.base_text);
            let items = forward(base, rates);
            debug!(base = %items.base, total = %items.total, "Computed total from base");
            Computation::resolved(EditDirection::Base, rates, items, true)
        }
        EditDirection::Total => {
            let total = parse_amount_cents(&input.total_text);
            match inverse(total, rates) {
                Ok(inversion) => {
                    let items = forward(inversion.base, rates);
                    debug!(
                        total = %total,
                        base = %items.base,
                        exact = inversion.exact,
                        evaluations = inversion.evaluations,
                        "Solved base from total"
                    );
                    Computation::resolved(EditDirection::Total, rates, items, inversion.exact)
                }
                Err(LedgerError::NotInvertible {
                    reason,
                    factor_percent,
                }) => Computation::Unresolved(Unresolved {
                    rates,
                    total,
                    reason,
                    factor_percent,
                }),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
