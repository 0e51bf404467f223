//! # Session State
//!
//! Holds what the calculator's fields currently say and turns every field
//! event into a display snapshot.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Host Event               Session Method          State Change          │
//! │  ──────────               ──────────────          ────────────          │
//! │                                                                         │
//! │  Type in base ───────────► edit_base() ─────────► base text, Base       │
//! │                                                                         │
//! │  Type in total ──────────► edit_total() ────────► total text, Total     │
//! │                                                                         │
//! │  Type a percentage ──────► edit_*_rate() ───────► percent text          │
//! │                                                                         │
//! │  Click a toggle ─────────► toggle_*() ──────────► enabled flag          │
//! │                                                                         │
//! │  Every event ──► compute() ──► Snapshot ──► host renders                │
//! │                                   │                                     │
//! │                                   └──► write-back into the other field  │
//! │                                        (echo of it is swallowed once)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write-Back Guard
//! When the base is edited, the session writes the new total into the
//! total field. A host whose field fires a change event for that
//! programmatic write would make the total authoritative and solve the base
//! again. The session remembers the text it wrote and ignores exactly one
//! matching event for that field.

use fiscalc_core::input::{try_parse_amount_cents, try_parse_percent};
use fiscalc_core::{
    compute, CalculatorInput, Computation, CoreError, EditDirection, Money, Resolved,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use ts_rs::TS;

use super::config::SessionConfig;
use crate::error::SessionResult;

// =============================================================================
// Events
// =============================================================================

/// A field event coming from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The base field now reads this text.
    EditBase(String),
    /// The total field now reads this text.
    EditTotal(String),
    /// The additive percentage field now reads this text.
    EditAdditiveRate(String),
    /// The subtractive percentage field now reads this text.
    EditSubtractiveRate(String),
    /// The additive tax was switched on or off.
    ToggleAdditive,
    /// The withholding was switched on or off.
    ToggleSubtractive,
    /// Recompute without changing anything (initial render).
    Refresh,
}

// =============================================================================
// Snapshot
// =============================================================================

/// A value the host must write into an amount field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldWrite {
    /// Field to write into.
    pub field: EditDirection,
    /// Plain decimal text ("10.60"), suitable for a numeric input.
    pub text: String,
}

/// Everything the host needs to render after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Formatted base line.
    pub base: String,
    /// Formatted additive tax line.
    pub additive: String,
    /// Formatted withholding line (shown as a deduction).
    pub subtractive: String,
    /// Formatted total line.
    pub total: String,
    /// Whether the additive line row is visible.
    pub show_additive: bool,
    /// Whether the withholding line row is visible.
    pub show_subtractive: bool,
    /// Counterpart value for the non-authoritative amount field.
    pub write_back: Option<FieldWrite>,
    /// False when the typed total is not reachable and the base is the
    /// closest estimate.
    pub exact: bool,
    /// True when the base cannot be determined; lines hold placeholders.
    pub unresolved: bool,
}

impl Snapshot {
    /// Renders a computation with the session's display settings.
    pub fn from_computation(computation: &Computation, config: &SessionConfig) -> Self {
        match computation {
            Computation::Resolved(resolved) => {
                let items = &resolved.items;
                Snapshot {
                    base: config.format_currency(items.base),
                    additive: config.format_currency(items.additive_amount),
                    subtractive: if resolved.show_subtractive {
                        config.format_deduction(items.subtractive_amount)
                    } else {
                        config.format_currency(Money::zero())
                    },
                    total: config.format_currency(items.total),
                    show_additive: resolved.show_additive,
                    show_subtractive: resolved.show_subtractive,
                    write_back: Some(FieldWrite {
                        field: resolved.write_back.field,
                        text: resolved.write_back.amount.to_string(),
                    }),
                    exact: resolved.exact,
                    unresolved: false,
                }
            }
            Computation::Unresolved(unresolved) => Snapshot {
                base: config.placeholder.clone(),
                additive: config.placeholder.clone(),
                subtractive: config.placeholder.clone(),
                total: config.format_currency(unresolved.total),
                show_additive: !unresolved.rates.additive.is_zero(),
                show_subtractive: !unresolved.rates.subtractive.is_zero(),
                write_back: None,
                exact: false,
                unresolved: true,
            },
        }
    }

    /// Encodes the snapshot as JSON for the host.
    pub fn to_json(&self) -> SessionResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// =============================================================================
// Session
// =============================================================================

/// The calculator's field state.
///
/// ## Invariants
/// - `input` always mirrors what the host's fields display
/// - `pending_echo` is armed only right after a write-back
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    input: CalculatorInput,
    pending_echo: Option<FieldWrite>,
}

impl Session {
    /// Creates a session with fields at their configured defaults.
    ///
    /// A disabled withholding starts with "0" in its field, so enabling it
    /// fills in the configured default.
    pub fn new(config: SessionConfig) -> Self {
        let subtractive_percent_text = if config.subtractive_enabled {
            config.default_subtractive_percent.clone()
        } else {
            "0".to_string()
        };

        let input = CalculatorInput {
            additive_percent_text: config.default_additive_percent.clone(),
            subtractive_percent_text,
            additive_enabled: config.additive_enabled,
            subtractive_enabled: config.subtractive_enabled,
            ..CalculatorInput::default()
        };

        Session {
            config,
            input,
            pending_echo: None,
        }
    }

    /// Returns the current field state.
    pub fn input(&self) -> &CalculatorInput {
        &self.input
    }

    /// Dispatches a host event.
    ///
    /// Returns `None` when the event was the echo of a write-back.
    pub fn handle(&mut self, event: SessionEvent) -> Option<Snapshot> {
        match event {
            SessionEvent::EditBase(text) => self.edit_base(&text),
            SessionEvent::EditTotal(text) => self.edit_total(&text),
            SessionEvent::EditAdditiveRate(text) => Some(self.edit_additive_rate(&text)),
            SessionEvent::EditSubtractiveRate(text) => Some(self.edit_subtractive_rate(&text)),
            SessionEvent::ToggleAdditive => Some(self.toggle_additive()),
            SessionEvent::ToggleSubtractive => Some(self.toggle_subtractive()),
            SessionEvent::Refresh => Some(self.refresh()),
        }
    }

    /// Decodes a JSON event, dispatches it, and encodes the snapshot.
    ///
    /// ## Usage
    /// ```rust
    /// use fiscalc_session::{Session, SessionConfig};
    ///
    /// let mut session = Session::new(SessionConfig::default());
    /// let reply = session
    ///     .handle_json(r#"{"type":"edit_base","value":"100"}"#)
    ///     .unwrap()
    ///     .unwrap();
    /// assert!(reply.contains("\"total\":\"121,00\u{a0}€\""));
    /// ```
    pub fn handle_json(&mut self, event_json: &str) -> SessionResult<Option<String>> {
        let event: SessionEvent = serde_json::from_str(event_json)?;
        self.handle(event).map(|snapshot| snapshot.to_json()).transpose()
    }

    /// The base field changed.
    pub fn edit_base(&mut self, text: &str) -> Option<Snapshot> {
        self.edit_amount(EditDirection::Base, text)
    }

    /// The total field changed.
    pub fn edit_total(&mut self, text: &str) -> Option<Snapshot> {
        self.edit_amount(EditDirection::Total, text)
    }

    /// The additive percentage field changed.
    pub fn edit_additive_rate(&mut self, text: &str) -> Snapshot {
        self.input.additive_percent_text = text.to_string();
        self.recompute()
    }

    /// The withholding percentage field changed.
    pub fn edit_subtractive_rate(&mut self, text: &str) -> Snapshot {
        self.input.subtractive_percent_text = text.to_string();
        self.recompute()
    }

    /// Switches the additive tax on or off.
    ///
    /// The percentage text is kept while off; switching back on with an
    /// empty or "0" field restores the configured default.
    pub fn toggle_additive(&mut self) -> Snapshot {
        self.input.additive_enabled = !self.input.additive_enabled;
        if self.input.additive_enabled && is_unset(&self.input.additive_percent_text) {
            self.input.additive_percent_text = self.config.default_additive_percent.clone();
        }
        debug!(enabled = self.input.additive_enabled, "Additive tax toggled");
        self.recompute()
    }

    /// Switches the withholding on or off.
    ///
    /// ## User Workflow
    /// ```text
    /// IRPF field "0", disabled
    ///      │
    ///      ▼
    /// toggle_subtractive() ← THIS FUNCTION
    ///      │
    ///      ▼
    /// IRPF field "15", enabled, total recomputed
    /// ```
    pub fn toggle_subtractive(&mut self) -> Snapshot {
        self.input.subtractive_enabled = !self.input.subtractive_enabled;
        if self.input.subtractive_enabled && is_unset(&self.input.subtractive_percent_text) {
            self.input.subtractive_percent_text = self.config.default_subtractive_percent.clone();
        }
        debug!(enabled = self.input.subtractive_enabled, "Withholding toggled");
        self.recompute()
    }

    /// Recomputes without changing any field.
    pub fn refresh(&mut self) -> Snapshot {
        self.recompute()
    }

    /// Computes strictly: parse failures and a non-invertible ledger are
    /// reported instead of degrading to zero or a placeholder.
    ///
    /// Disabled taxes are not validated, since their text does not apply.
    pub fn check(&self) -> SessionResult<Resolved> {
        let amount = match self.input.last_edited {
            EditDirection::Base => try_parse_amount_cents("base", &self.input.base_text),
            EditDirection::Total => try_parse_amount_cents("total", &self.input.total_text),
        };
        amount.map_err(CoreError::from)?;

        if self.input.additive_enabled {
            try_parse_percent("additive rate", &self.input.additive_percent_text)
                .map_err(CoreError::from)?;
        }
        if self.input.subtractive_enabled {
            try_parse_percent("subtractive rate", &self.input.subtractive_percent_text)
                .map_err(CoreError::from)?;
        }

        Ok(compute(&self.input).into_result()?)
    }

    fn edit_amount(&mut self, field: EditDirection, text: &str) -> Option<Snapshot> {
        if let Some(echo) = self.pending_echo.take() {
            if echo.field == field && echo.text == text {
                trace!(?field, text, "Ignoring echo of write-back");
                return None;
            }
        }

        match field {
            EditDirection::Base => self.input.base_text = text.to_string(),
            EditDirection::Total => self.input.total_text = text.to_string(),
        }
        self.input.last_edited = field;
        Some(self.recompute())
    }

    fn recompute(&mut self) -> Snapshot {
        let computation = compute(&self.input);
        let snapshot = Snapshot::from_computation(&computation, &self.config);

        self.pending_echo = snapshot.write_back.clone();
        if let Some(write) = &snapshot.write_back {
            match write.field {
                EditDirection::Base => self.input.base_text = write.text.clone(),
                EditDirection::Total => self.input.total_text = write.text.clone(),
            }
        }

        debug!(
            direction = ?self.input.last_edited,
            unresolved = snapshot.unresolved,
            exact = snapshot.exact,
            "Session recomputed"
        );
        snapshot
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(SessionConfig::default())
    }
}

/// A percentage field that has never been given a real value.
fn is_unset(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == "0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const NBSP: char = '\u{a0}';

    fn euros(text: &str) -> String {
        format!("{text}{NBSP}€")
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::default();
        assert_eq!(session.input().additive_percent_text, "21");
        assert_eq!(session.input().subtractive_percent_text, "0");
        assert!(session.input().additive_enabled);
        assert!(!session.input().subtractive_enabled);
    }

    #[test]
    fn test_edit_base_renders_lines() {
        let mut session = Session::default();
        let snapshot = session.edit_base("100").unwrap();

        assert_eq!(snapshot.base, euros("100,00"));
        assert_eq!(snapshot.additive, euros("21,00"));
        assert_eq!(snapshot.total, euros("121,00"));
        assert!(snapshot.show_additive);
        assert!(!snapshot.show_subtractive);
        assert_eq!(snapshot.subtractive, euros("0,00"));
        assert_eq!(
            snapshot.write_back,
            Some(FieldWrite {
                field: EditDirection::Total,
                text: "121.00".to_string(),
            })
        );
        assert_eq!(session.input().total_text, "121.00");
    }

    #[test]
    fn test_write_back_echo_is_swallowed_once() {
        let mut session = Session::default();
        session.edit_base("100").unwrap();

        // Host wrote "121.00" into the total field and it fired an event.
        assert!(session.edit_total("121.00").is_none());
        assert_eq!(session.input().last_edited, EditDirection::Base);

        // The same text typed again by the user is a real edit.
        let snapshot = session.edit_total("121.00").unwrap();
        assert_eq!(session.input().last_edited, EditDirection::Total);
        assert_eq!(snapshot.base, euros("100,00"));
    }

    #[test]
    fn test_different_text_is_not_an_echo() {
        let mut session = Session::default();
        session.edit_base("100").unwrap();

        let snapshot = session.edit_total("242").unwrap();
        assert_eq!(session.input().last_edited, EditDirection::Total);
        assert_eq!(snapshot.base, euros("200,00"));
        assert_eq!(session.input().base_text, "200.00");
    }

    #[test]
    fn test_toggle_subtractive_restores_default() {
        let mut session = Session::default();
        session.edit_base("1000").unwrap();

        let snapshot = session.toggle_subtractive();
        assert_eq!(session.input().subtractive_percent_text, "15");
        assert!(snapshot.show_subtractive);
        assert_eq!(snapshot.subtractive, format!("\u{2212} {}", euros("150,00")));
        assert_eq!(snapshot.total, euros("1060,00"));
    }

    #[test]
    fn test_disabled_tax_remembers_its_text() {
        let mut session = Session::default();
        session.edit_base("1000").unwrap();
        session.toggle_subtractive();
        session.edit_subtractive_rate("7");

        let off = session.toggle_subtractive();
        assert!(!off.show_subtractive);
        assert_eq!(off.total, euros("1210,00"));
        assert_eq!(session.input().subtractive_percent_text, "7");

        let on = session.toggle_subtractive();
        assert_eq!(on.total, euros("1140,00"));
    }

    #[test]
    fn test_toggle_additive_off() {
        let mut session = Session::default();
        session.edit_base("50").unwrap();

        let snapshot = session.toggle_additive();
        assert!(!snapshot.show_additive);
        assert_eq!(snapshot.total, euros("50,00"));
        assert_eq!(session.input().additive_percent_text, "21");
    }

    #[test]
    fn test_rate_edit_keeps_direction() {
        let mut session = Session::default();
        session.edit_total("121").unwrap();

        let snapshot = session.edit_additive_rate("10");
        assert_eq!(session.input().last_edited, EditDirection::Total);
        assert_eq!(snapshot.base, euros("110,00"));
        assert_eq!(snapshot.total, euros("121,00"));
    }

    #[test]
    fn test_unresolved_renders_placeholders() {
        let mut session = Session::default();
        session.toggle_additive();
        session.toggle_subtractive();
        session.edit_subtractive_rate("100");

        let snapshot = session.edit_total("50").unwrap();
        assert!(snapshot.unresolved);
        assert_eq!(snapshot.base, "—");
        assert_eq!(snapshot.subtractive, "—");
        assert_eq!(snapshot.total, euros("50,00"));
        assert!(snapshot.write_back.is_none());
        assert!(snapshot.show_subtractive);
    }

    #[test]
    fn test_handle_json_roundtrip() {
        let mut session = Session::default();
        let reply = session
            .handle_json(r#"{"type":"edit_total","value":"12,10"}"#)
            .unwrap()
            .unwrap();

        let snapshot: Snapshot = serde_json::from_str(&reply).unwrap();
        assert_eq!(snapshot.base, euros("10,00"));
        assert_eq!(snapshot.write_back.unwrap().field, EditDirection::Base);

        let reply = session.handle_json(r#"{"type":"toggle_subtractive"}"#).unwrap();
        assert!(reply.is_some());
    }

    #[test]
    fn test_handle_json_rejects_bad_events() {
        let mut session = Session::default();
        let err = session.handle_json(r#"{"type":"explode"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEvent);
    }

    #[test]
    fn test_check_is_strict() {
        let mut session = Session::default();
        session.edit_base("abc");
        let err = session.check().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        session.edit_base("100");
        session.edit_additive_rate("21.5");
        assert_eq!(session.check().unwrap_err().code, ErrorCode::ValidationError);

        session.edit_additive_rate("21");
        let resolved = session.check().unwrap();
        assert_eq!(resolved.items.total.cents(), 12_100);
    }

    #[test]
    fn test_check_reports_not_invertible() {
        let mut session = Session::default();
        session.toggle_additive();
        session.toggle_subtractive();
        session.edit_subtractive_rate("100");
        session.edit_total("50");

        assert_eq!(session.check().unwrap_err().code, ErrorCode::NotInvertible);
    }
}
