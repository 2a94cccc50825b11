//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/TOML/JSON)
//!     → loader.rs (parse into a ConfigDocument)
//!     → store.rs (ConfigStore, shared via Arc to all consumers)
//!     → validation.rs (required sections present, checked once at startup)
//!
//! Lookups:
//!     dotted path "api.huggingface.timeout"
//!     → document.rs walks one segment at a time
//!     → absent / non-mapping segment → caller's default
//!
//! On reload (explicit, or watcher.rs detects a change):
//!     → loader.rs parses the new file completely
//!     → atomic swap of Arc<ConfigDocument>
//!     → readers observe either the old or the new tree, never a mix
//! ```
//!
//! # Design Decisions
//! - The document is immutable once loaded; changes require a full reload
//! - Missing keys are modelled as defaults, never as errors
//! - schema.rs gives typed views of sections without constraining the document

pub mod document;
pub mod loader;
pub mod schema;
pub mod store;
pub mod template;
pub mod validation;
pub mod watcher;

pub use document::{ConfigDocument, ConfigMap};
pub use schema::{ConsoleSinkSettings, FileSinkSettings, LimitsSettings, LoggingSettings};
pub use store::ConfigStore;
pub use validation::REQUIRED_KEYS;
pub use watcher::{ConfigWatcher, ReloadEvent};
