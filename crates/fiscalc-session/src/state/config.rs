//! # Configuration State
//!
//! Defaults and display settings for a calculator session.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FISCALC_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use fiscalc_core::Money;
use serde::{Deserialize, Serialize};

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Percentage text the additive tax starts with (and falls back to when
    /// re-enabled with an empty field).
    pub default_additive_percent: String,

    /// Percentage text restored when the withholding is enabled while its
    /// field still reads "0".
    pub default_subtractive_percent: String,

    /// Whether the additive tax starts enabled.
    pub additive_enabled: bool,

    /// Whether the withholding starts enabled.
    pub subtractive_enabled: bool,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Thousands separator (for display)
    pub group_separator: char,

    /// Decimal separator (for display)
    pub decimal_separator: char,

    /// Integer digits required before grouping kicks in.
    /// Spanish formatting leaves "1234" ungrouped but writes "12.345".
    pub min_grouping_digits: usize,

    /// Shown instead of a number when the base cannot be determined.
    pub placeholder: String,
}

impl Default for SessionConfig {
    /// Returns the Spanish defaults.
    ///
    /// ## Default Values
    /// - VAT (IVA): 21%, enabled
    /// - Withholding (IRPF): 15%, disabled
    /// - Currency: "1.234,56 €" style (es-ES)
    fn default() -> Self {
        SessionConfig {
            default_additive_percent: "21".to_string(),
            default_subtractive_percent: "15".to_string(),
            additive_enabled: true,
            subtractive_enabled: false,
            currency_symbol: "€".to_string(),
            group_separator: '.',
            decimal_separator: ',',
            min_grouping_digits: 5,
            placeholder: "—".to_string(),
        }
    }
}

impl SessionConfig {
    /// Creates a SessionConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FISCALC_VAT_PERCENT`: starting additive percentage (e.g., "21")
    /// - `FISCALC_WITHHOLDING_PERCENT`: default withholding (e.g., "15")
    /// - `FISCALC_WITHHOLDING_ENABLED`: "1"/"true" to start with it on
    /// - `FISCALC_CURRENCY_SYMBOL`: override "€"
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SessionConfig::default();

        if let Some(percent) = lookup("FISCALC_VAT_PERCENT") {
            config.default_additive_percent = percent;
        }

        if let Some(percent) = lookup("FISCALC_WITHHOLDING_PERCENT") {
            config.default_subtractive_percent = percent;
        }

        if let Some(enabled) = lookup("FISCALC_WITHHOLDING_ENABLED") {
            config.subtractive_enabled = matches!(
                enabled.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        if let Some(symbol) = lookup("FISCALC_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use fiscalc_core::Money;
    /// use fiscalc_session::SessionConfig;
    ///
    /// let config = SessionConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(123456)), "1234,56\u{a0}€");
    /// assert_eq!(config.format_currency(Money::from_cents(1234567)), "12.345,67\u{a0}€");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let digits = amount.units().abs().to_string();

        let mut whole = String::with_capacity(digits.len() + digits.len() / 3);
        if digits.len() >= self.min_grouping_digits {
            for (i, digit) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    whole.push(self.group_separator);
                }
                whole.push(digit);
            }
        } else {
            whole.push_str(&digits);
        }

        format!(
            "{}{}{}{:02}\u{a0}{}",
            if amount.is_negative() { "-" } else { "" },
            whole,
            self.decimal_separator,
            amount.cents_part(),
            self.currency_symbol
        )
    }

    /// Formats a withheld amount, which is shown as a deduction.
    pub fn format_deduction(&self, amount: Money) -> String {
        format!("\u{2212} {}", self.format_currency(amount))
    }
}
