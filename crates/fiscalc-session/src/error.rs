//! # Session Error Type
//!
//! Unified error type for host calls into a session.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Fiscalc                                │
//! │                                                                         │
//! │  Host                          Rust                                     │
//! │  ────                          ────                                     │
//! │                                                                         │
//! │  session.handle_json(event)                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Malformed event JSON? ──── serde_json::Error ───────┐                  │
//! │         │                                            │                  │
//! │         ▼                                            ▼                  │
//! │  Strict validation? ─────── CoreError::Validation ── SessionError ────► │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Snapshot ─────────────────────────────────────────────────────────────►│
//! │                                                                         │
//! │  Typing garbage into a field is NOT an error: it computes as zero.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fiscalc_core::{CoreError, LedgerError};
use serde::Serialize;

/// Error returned to the host.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "base must not be negative"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for host responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Event payload could not be decoded
    InvalidEvent,

    /// Field failed strict validation
    ValidationError,

    /// The base cannot be determined for these rates
    NotInvertible,

    /// Snapshot could not be encoded
    Internal,
}

impl SessionError {
    /// Creates a new session error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        SessionError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts core errors to session errors.
impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => SessionError::validation(e.to_string()),
            CoreError::Ledger(e @ LedgerError::NotInvertible { .. }) => {
                SessionError::new(ErrorCode::NotInvertible, e.to_string())
            }
        }
    }
}

/// Converts JSON errors: decoding failures are the host's fault,
/// encoding failures are ours.
impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            SessionError::new(ErrorCode::InvalidEvent, format!("Invalid event: {}", err))
        } else {
            tracing::error!("Snapshot encoding failed: {}", err);
            SessionError::new(ErrorCode::Internal, "Snapshot encoding failed")
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for SessionError {}

/// Convenience type alias for session results.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fiscalc_core::{NotInvertibleReason, ValidationError};

    #[test]
    fn test_validation_maps_to_validation_code() {
        let err: SessionError = CoreError::Validation(ValidationError::Negative {
            field: "base".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "base must not be negative");
    }

    #[test]
    fn test_ledger_maps_to_not_invertible() {
        let err: SessionError = CoreError::Ledger(LedgerError::NotInvertible {
            reason: NotInvertibleReason::Factor,
            factor_percent: 0,
        })
        .into();
        assert_eq!(err.code, ErrorCode::NotInvertible);
    }

    #[test]
    fn test_bad_json_maps_to_invalid_event() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SessionError = json_err.into();
        assert_eq!(err.code, ErrorCode::InvalidEvent);
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = SessionError::validation("vat must be a whole percentage, got 21.5");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "vat must be a whole percentage, got 21.5");
    }
}
