//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     ConfigSlot::get_or_load → validate → DiagnosticsLog::setup → AppContext
//!
//! Secrets (secrets.rs):
//!     environment → secrets file → ApiKey
//!
//! Signals (signals.rs):
//!     ctrl-c → stop the watch loop
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging
//! - Secrets never pass through the configuration file

pub mod secrets;
pub mod signals;
pub mod startup;

pub use secrets::{load_api_key, ApiKey, SecretError};
pub use startup::{AppContext, ConfigSlot};
