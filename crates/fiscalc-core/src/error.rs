//! # Error Types
//!
//! Domain-specific error types for fiscalc-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fiscalc-core errors (this file)                                        │
//! │  ├── CoreError        - Umbrella for `?` propagation                    │
//! │  ├── LedgerError      - Structural failures of the inverse ledger       │
//! │  └── ValidationError  - Strict-mode input failures (opt-in)             │
//! │                                                                         │
//! │  fiscalc-session errors (separate crate)                                │
//! │  └── SessionError     - Snapshot serialization                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Malformed text, negative amounts and out-of-range percentages are
//! silently normalised by [`crate::input`]. An inversion that found no exact
//! base is flagged with `exact: false` on [`crate::ledger::Inversion`], not
//! reported here.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Core calculation errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The ledger could not be computed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Ledger Error
// =============================================================================

/// Why a total cannot be turned back into a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotInvertibleReason {
    /// `1 + additive - subtractive <= 0`: every base maps to a total of zero
    /// or less, so the total carries no information about the base.
    Factor,
}

impl fmt::Display for NotInvertibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotInvertibleReason::Factor => f.write_str("factor"),
        }
    }
}

/// Ledger computation errors.
///
/// Permanent for a given rate combination; retrying with the same rates
/// gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The rate combination has no inverse.
    ///
    /// ## When This Occurs
    /// ```text
    /// Withholding 100%, VAT 0%  ──► factor = 1 + 0 - 1 = 0
    ///      │
    ///      ▼
    /// NotInvertible { reason: Factor }
    ///      │
    ///      ▼
    /// UI shows "—" for base and tax lines
    /// ```
    #[error("Cannot determine base from total (reason: {reason}, factor {factor_percent}%)")]
    NotInvertible {
        reason: NotInvertibleReason,
        factor_percent: i64,
    },
}

impl LedgerError {
    /// Returns the reason code for a non-invertible ledger.
    pub fn reason(&self) -> NotInvertibleReason {
        match self {
            LedgerError::NotInvertible { reason, .. } => *reason,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Only produced by the strict `try_*` parsers. The live-typing path never
/// sees these.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Text is not a finite number.
    #[error("{field} is not a valid number: '{text}'")]
    InvalidNumber { field: String, text: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Percentage carries a fractional part.
    #[error("{field} must be a whole percentage, got {text}")]
    FractionalPercent { field: String, text: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_invertible_message() {
        let err = LedgerError::NotInvertible {
            reason: NotInvertibleReason::Factor,
            factor_percent: 0,
        };
        assert_eq!(
            err.to_string(),
            "Cannot determine base from total (reason: factor, factor 0%)"
        );
        assert_eq!(err.reason(), NotInvertibleReason::Factor);
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidNumber {
            field: "base".to_string(),
            text: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "base is not a valid number: 'abc'");

        let err = ValidationError::OutOfRange {
            field: "vat".to_string(),
            min: 0,
            max: 10000,
        };
        assert_eq!(err.to_string(), "vat must be between 0 and 10000");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let validation_err = ValidationError::Negative {
            field: "base".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let ledger_err = LedgerError::NotInvertible {
            reason: NotInvertibleReason::Factor,
            factor_percent: -5,
        };
        let core_err: CoreError = ledger_err.into();
        assert!(matches!(core_err, CoreError::Ledger(_)));
    }

    #[test]
    fn test_reason_serializes_as_snake_case() {
        let json = serde_json::to_string(&NotInvertibleReason::Factor).unwrap();
        assert_eq!(json, "\"factor\"");
    }
}
