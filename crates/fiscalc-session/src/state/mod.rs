//! # State Module
//!
//! Session state for a calculator host.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────┐      │
//! │  │   SessionConfig      │───────►│   Session                    │      │
//! │  │                      │        │                              │      │
//! │  │  default rates       │        │  CalculatorInput (fields)    │      │
//! │  │  currency format     │        │  pending write-back echo     │      │
//! │  │  placeholder         │        │                              │      │
//! │  └──────────────────────┘        └──────────────┬───────────────┘      │
//! │                                                 │                       │
//! │                                                 ▼                       │
//! │                                  fiscalc_core::compute() ──► Snapshot   │
//! │                                                                         │
//! │  Config is read-only after construction; the Session is owned by the   │
//! │  host and mutated one event at a time.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::SessionConfig;
pub use session::{FieldWrite, Session, SessionEvent, Snapshot};
