//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Callers:
//!     DiagnosticsLog::{debug..critical, log_*}   (logging.rs)
//!     tracing::info!/warn!/..  → DiagnosticsLayer (layer.rs)
//!     traced / instrument wrappers                (instrument.rs)
//!
//! DiagnosticsLog:
//!     threshold check → LogRecord (record.rs) → handler lock
//!         → LineFormat → RotatingFileSink (rotating.rs, plain)
//!         → LineFormat → ConsoleSink      (console.rs, coloured level)
//!
//! Side channel:
//!     API-call / performance helpers → metrics facade (metrics.rs)
//! ```
//!
//! # Design Decisions
//! - Handlers are configured from the `logging` section, never hard-coded
//! - A failing sink degrades to stderr notices, never to a failed call
//! - One handle type shared by clones and child loggers

pub mod console;
pub mod instrument;
pub mod layer;
pub mod level;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod rotating;

pub use layer::DiagnosticsLayer;
pub use level::Severity;
pub use logging::{context, ApiCallStatus, DiagnosticsLog, SetupReport, ROOT_LOGGER};
pub use record::{LineFormat, LogContext, LogRecord};
pub use rotating::RotatingFileSink;
