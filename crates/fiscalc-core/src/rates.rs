//! # Rates Module
//!
//! Whole-percentage tax rates and the resolver that builds them from field
//! text.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "21,9"  ──► parse ──► 21.9 ──► floor ──► 21 ──► clamp ──► Rate(21)     │
//! │                                                              │          │
//! │                                            enabled? ─── no ──► Rate(0)  │
//! │                                                │                        │
//! │                                               yes ──► Rate(21) = 0.21   │
//! │                                                                         │
//! │  The stored text is never touched: a disabled tax remembers "21" so    │
//! │  switching it back on restores the last value.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::input::parse_percent;
use crate::MAX_PERCENT;

// =============================================================================
// Rate
// =============================================================================

/// A flat tax rate in whole percent.
///
/// ## Why Whole Percent?
/// Fractional percentages are not supported by the calculator, and an
/// integer percent keeps `cents × rate` in exact integer arithmetic.
/// `Rate(21)` is the dimensionless rate `0.21`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from whole percent, clamped to `MAX_PERCENT`.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        if percent > MAX_PERCENT {
            Rate(MAX_PERCENT)
        } else {
            Rate(percent)
        }
    }

    /// Returns the rate in whole percent.
    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Resolves a rate from percentage text and its enabled flag.
///
/// Never fails: unparsable text resolves to zero, and a disabled tax
/// resolves to zero whatever its text says.
///
/// ## Example
/// ```rust
/// use fiscalc_core::rates::resolve;
///
/// assert_eq!(resolve("21", true).percent(), 21);
/// assert_eq!(resolve("21", false).percent(), 0);
/// assert_eq!(resolve("21.9", true).percent(), 21);
/// ```
pub fn resolve(raw_percent_text: &str, enabled: bool) -> Rate {
    if !enabled {
        return Rate::zero();
    }
    Rate::from_percent(parse_percent(raw_percent_text))
}

// =============================================================================
// RateConfig
// =============================================================================

/// The two resolved rates feeding a ledger computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateConfig {
    /// Rate added on top of the base (e.g. VAT).
    pub additive: Rate,
    /// Rate withheld from the total (e.g. income-tax retention).
    pub subtractive: Rate,
}

impl RateConfig {
    /// Creates a config from already-resolved rates.
    pub const fn new(additive: Rate, subtractive: Rate) -> Self {
        RateConfig {
            additive,
            subtractive,
        }
    }

    /// Creates a config from whole percentages (both taxes enabled).
    pub const fn from_percents(additive: u32, subtractive: u32) -> Self {
        RateConfig::new(Rate::from_percent(additive), Rate::from_percent(subtractive))
    }

    /// Resolves both rates from field text and toggles.
    pub fn resolve(
        additive_text: &str,
        additive_enabled: bool,
        subtractive_text: &str,
        subtractive_enabled: bool,
    ) -> Self {
        RateConfig::new(
            resolve(additive_text, additive_enabled),
            resolve(subtractive_text, subtractive_enabled),
        )
    }

    /// The ledger factor `1 + additive - subtractive`, in whole percent.
    ///
    /// `100` means the total equals the base. Zero or below means the
    /// ledger cannot be inverted.
    pub const fn factor_percent(&self) -> i64 {
        100 + self.additive.0 as i64 - self.subtractive.0 as i64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_basic() {
        assert_eq!(resolve("21", true), Rate::from_percent(21));
        assert_eq!(resolve("15", true).percent(), 15);
    }

    #[test]
    fn test_disabled_tax_is_zero() {
        assert_eq!(resolve("21", false), Rate::zero());
        assert_eq!(resolve("15", false), Rate::zero());
        assert_eq!(resolve("garbage", false), Rate::zero());
    }

    #[test]
    fn test_floor_percent_policy() {
        assert_eq!(resolve("21.9", true).percent(), 21);
        assert_eq!(resolve("15,99", true).percent(), 15);
    }

    #[test]
    fn test_invalid_text_is_zero() {
        assert!(resolve("abc", true).is_zero());
        assert!(resolve("", true).is_zero());
        assert!(resolve("-15", true).is_zero());
    }

    #[test]
    fn test_from_percent_clamps() {
        assert_eq!(Rate::from_percent(u32::MAX).percent(), MAX_PERCENT);
    }

    #[test]
    fn test_rate_config_resolve() {
        let config = RateConfig::resolve("21", true, "15", false);
        assert_eq!(config.additive.percent(), 21);
        assert!(config.subtractive.is_zero());
        assert_eq!(config.factor_percent(), 121);
    }

    #[test]
    fn test_factor_percent() {
        assert_eq!(RateConfig::from_percents(21, 15).factor_percent(), 106);
        assert_eq!(RateConfig::from_percents(0, 100).factor_percent(), 0);
        assert_eq!(RateConfig::from_percents(0, 150).factor_percent(), -50);
    }
}
