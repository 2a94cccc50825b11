//! Configuration file watcher for hot reload.

use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::store::ConfigStore;
use crate::error::TextMorphError;

/// Outcome of a reload triggered by a file change.
#[derive(Debug, Clone, PartialEq)]
pub enum ReloadEvent {
    Reloaded { generation: u64 },
    Failed { error: TextMorphError },
}

/// Reloads a [`ConfigStore`] whenever its backing file changes.
pub struct ConfigWatcher {
    store: Arc<ConfigStore>,
    event_tx: mpsc::UnboundedSender<ReloadEvent>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for reload outcomes.
    pub fn new(store: Arc<ConfigStore>) -> (Self, mpsc::UnboundedReceiver<ReloadEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Self { store, event_tx }, event_rx)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.event_tx.clone();
        let store = Arc::clone(&self.store);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        let outcome = match store.reload() {
                            Ok(()) => ReloadEvent::Reloaded {
                                generation: store.generation(),
                            },
                            Err(error) => {
                                tracing::error!(
                                    "Failed to reload config: {}. Keeping current configuration.",
                                    error
                                );
                                ReloadEvent::Failed { error }
                            }
                        };
                        let _ = tx.send(outcome);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(self.store.path(), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.store.path(), "Config watcher started");
        Ok(watcher)
    }
}
