//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration exactly once per slot
//! - Validate required sections before anything else starts
//! - Build the diagnostics logger from the loaded configuration
//!
//! # Design Decisions
//! - Fail fast: a configuration error is fatal
//! - The slot is owned by the host, not a hidden global

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::store::ConfigStore;
use crate::error::Result;
use crate::observability::logging::{DiagnosticsLog, SetupReport};

/// Holds the configuration store once it has been loaded.
///
/// The first successful [`get_or_load`](Self::get_or_load) wins; later calls
/// return the same store without touching the filesystem, whatever path
/// they pass. A failed load leaves the slot empty.
#[derive(Debug, Default)]
pub struct ConfigSlot {
    cell: OnceCell<Arc<ConfigStore>>,
}

impl ConfigSlot {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<ConfigStore>> {
        self.cell
            .get_or_try_init(|| ConfigStore::load(path).map(Arc::new))
            .map(Arc::clone)
    }

    pub fn get(&self) -> Option<Arc<ConfigStore>> {
        self.cell.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Everything a consumer needs: the live configuration and a logger handle.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<ConfigStore>,
    pub log: DiagnosticsLog,
    pub logging: SetupReport,
}

impl AppContext {
    /// Load, validate and set up logging from `path`.
    pub fn initialize(path: impl AsRef<Path>) -> Result<Self> {
        Self::initialize_in(&ConfigSlot::new(), path)
    }

    /// Same as [`initialize`](Self::initialize), reusing the store in `slot`
    /// when it is already loaded.
    pub fn initialize_in(slot: &ConfigSlot, path: impl AsRef<Path>) -> Result<Self> {
        let config = slot.get_or_load(path)?;
        config.validate()?;

        let (log, logging) = DiagnosticsLog::from_config(&config);
        log.info(format_args!(
            "{} v{} starting",
            config.app_name(),
            config.app_version()
        ));

        Ok(Self {
            config,
            log,
            logging,
        })
    }
}
