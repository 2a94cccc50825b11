//! Text Morph configuration and diagnostics library

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::ConfigStore;
pub use error::{error_code, format_error_for_ui, ErrorCategory, ErrorKind, Result, TextMorphError};
pub use lifecycle::{AppContext, ConfigSlot};
pub use observability::{DiagnosticsLayer, DiagnosticsLog, Severity};
