//! Bridge from `tracing` events into a [`DiagnosticsLog`].

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::observability::level::Severity;
use crate::observability::logging::DiagnosticsLog;
use crate::observability::record::LogContext;

/// Routes every `tracing` event into the diagnostics sinks.
///
/// The event target becomes the logger name, the `message` field the
/// message, and remaining fields the structured context.
#[derive(Debug, Clone)]
pub struct DiagnosticsLayer {
    log: DiagnosticsLog,
}

impl DiagnosticsLayer {
    pub fn new(log: DiagnosticsLog) -> Self {
        Self { log }
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticsLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Severity::from(metadata.level());
        if !self.log.is_enabled_for(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.log
            .emit_as(metadata.target(), level, visitor.message, visitor.context);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    context: LogContext,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.context.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.context
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ConsoleSinkSettings, FileSinkSettings, LoggingSettings};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_events_reach_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            format: "%(name)s %(levelname)s %(message)s".to_string(),
            file: FileSinkSettings {
                path: dir.path().to_path_buf(),
                filename: "bridge.log".to_string(),
                ..FileSinkSettings::default()
            },
            console: ConsoleSinkSettings {
                enabled: false,
                colored: false,
            },
            ..LoggingSettings::default()
        };
        let log = DiagnosticsLog::new();
        log.setup_with(&settings);

        let subscriber = tracing_subscriber::registry().with(DiagnosticsLayer::new(log.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "textmorph::config", path = "config.yaml", generation = 2, "Configuration reloaded");
            tracing::debug!(target: "textmorph::config", "below threshold");
            tracing::warn!(target: "textmorph::config", "Unknown placeholder");
        });

        assert_eq!(
            log.tail(2),
            vec![
                "textmorph::config INFO Configuration reloaded | generation=2, path=config.yaml",
                "textmorph::config WARNING Unknown placeholder",
            ]
        );
    }
}
