//! # fiscalc-core: Pure Calculation Engine for Fiscalc
//!
//! This crate is the **heart** of Fiscalc. Given a base amount or a final
//! total, plus an additive tax (VAT) and a subtractive withholding (income-tax
//! retention), it derives every other amount.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fiscalc Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Host (web page / desktop shell)              │   │
//! │  │    Base field ◄──► Total field    VAT %  IRPF %  toggles        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ events / snapshots                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    fiscalc-session                              │   │
//! │  │    Session, write-back guard, display formatting                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fiscalc-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   input   │  │   rates   │  │  ledger   │  │  compute  │  │   │
//! │  │   │  parsing  │  │ Rate      │  │ forward   │  │ direction │  │   │
//! │  │   │  "12,50"  │  │ RateConfig│  │ inverse   │  │ write-back│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO RETAINED STATE • PURE FUNCTIONS                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`input`] - Lenient (and strict) parsing of field text
//! - [`rates`] - Whole-percent rates and the enabled/disabled resolver
//! - [`ledger`] - Forward and inverse line-item computation
//! - [`compute`] - Direction-aware orchestration
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, nothing retained
//! 2. **Integer Money**: all amounts are cents (i64), all rates whole percent
//! 3. **Silent Normalisation**: bad text becomes zero, never an error
//! 4. **One Structural Failure**: a non-invertible rate combination
//!
//! ## Example Usage
//!
//! ```rust
//! use fiscalc_core::{forward, inverse, Money, RateConfig};
//!
//! let rates = RateConfig::from_percents(21, 15); // VAT 21%, withholding 15%
//!
//! let items = forward(Money::from_cents(1000), rates);
//! assert_eq!(items.total.cents(), 1060);
//!
//! let found = inverse(items.total, rates).unwrap();
//! assert_eq!(found.base.cents(), 1000);
//! assert!(found.exact);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod compute;
pub mod error;
pub mod input;
pub mod ledger;
pub mod money;
pub mod rates;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use compute::{compute, CalculatorInput, Computation, EditDirection, Resolved, Unresolved, WriteBack};
pub use error::{CoreError, CoreResult, LedgerError, NotInvertibleReason, ValidationError};
pub use ledger::{forward, inverse, Inversion, LineItems, MAX_SEARCH_BASE_CENTS};
pub use money::Money;
pub use rates::{resolve, Rate, RateConfig};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How far (in cents) the inverse search walks from its estimate.
///
/// ## Why 500?
/// A base `b` with an exact solution satisfies
/// `|total - b × factor| <= 1 cent` (half a cent per rounded line), so the
/// solution lies within `100 / factor_percent + 0.5` cents of the estimate.
/// Whole-percent rates give `factor_percent >= 1`, hence at most 101 cents.
/// 500 covers that with room to spare and caps the search at 1001
/// evaluations.
pub const SEARCH_RADIUS_CENTS: i64 = 500;

/// Largest accepted percentage (10 000%).
///
/// Keeps `cents × percent` and the inverse estimate inside `i64`.
pub const MAX_PERCENT: u32 = 10_000;

/// Largest accepted amount in cents (100 000 000 000.00).
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000_000;
