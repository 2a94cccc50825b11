//! OS signal handling.
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Only interrupt is handled; there is no reload-on-SIGHUP, the file
//!   watcher covers reloads

/// Resolve when the process receives ctrl-c.
///
/// If the handler cannot be installed this returns immediately, so a
/// caller waiting on it shuts down rather than hangs.
pub async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        return;
    }
    tracing::info!("Interrupt received, shutting down");
}
