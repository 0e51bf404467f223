//! # fiscalc-session: Host-Facing Session State
//!
//! The layer between a UI host and `fiscalc-core`.
//!
//! ## Module Organization
//! ```text
//! fiscalc_session/
//! ├── lib.rs          ◄─── You are here (exports & tracing setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── Defaults, env overrides, currency formatting
//! │   └── session.rs  ◄─── Field state, events, snapshots, write-back guard
//! └── error.rs        ◄─── Error type returned to the host
//! ```
//!
//! ## Host Loop
//! ```rust
//! use fiscalc_session::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default());
//! let snapshot = session.edit_base("1000").unwrap();
//!
//! // Render the lines, then write the total back into its field.
//! let write = snapshot.write_back.unwrap();
//! assert_eq!(write.text, "1210.00");
//!
//! // If writing the field fires a change event, the session ignores it.
//! assert!(session.edit_total(&write.text).is_none());
//! ```

pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::{ErrorCode, SessionError, SessionResult};
pub use state::{FieldWrite, Session, SessionConfig, SessionEvent, Snapshot};

/// Initializes tracing (logging) for a host process.
///
/// ## Filter
/// - Default: `info,fiscalc_core=debug,fiscalc_session=debug`
/// - Override with `RUST_LOG`, e.g. `RUST_LOG=fiscalc_core=trace`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fiscalc_core=debug,fiscalc_session=debug"));

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if initialized {
        info!("Tracing initialized");
    }
}
