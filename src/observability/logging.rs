//! Structured logging.
//!
//! # Responsibilities
//! - Build the handler set (rotating file sink, console sink) from the
//!   `logging` configuration section
//! - Leveled emission with optional key-value context
//! - Structured helpers for API calls, user actions, performance and errors
//! - Change the severity threshold at runtime
//!
//! # Design Decisions
//! - One mutex serializes handler replacement and record emission, so
//!   re-setup never loses or duplicates a record
//! - The threshold is an atomic: filtered records cost no lock and no formatting
//! - Sink failures go to stderr and never fail the caller
//! - No `tracing` calls while the handler lock is held; the tracing bridge
//!   feeds events back into this logger

use std::backtrace::Backtrace;
use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::schema::LoggingSettings;
use crate::config::store::ConfigStore;
use crate::error::{Result, TextMorphError};
use crate::observability::console::ConsoleSink;
use crate::observability::level::Severity;
use crate::observability::metrics;
use crate::observability::record::{join_pairs, LineFormat, LogContext, LogRecord};
use crate::observability::rotating::{tail_lines, RotatingFileSink};

/// Name of the root logger.
pub const ROOT_LOGGER: &str = "TextMorph";

#[derive(Debug)]
struct FileHandler {
    sink: RotatingFileSink,
    format: LineFormat,
}

#[derive(Debug)]
struct ConsoleHandler {
    sink: ConsoleSink,
    format: LineFormat,
}

/// Zero or one sink of each kind, each with its own formatter.
#[derive(Debug, Default)]
struct HandlerSet {
    file: Option<FileHandler>,
    console: Option<ConsoleHandler>,
}

#[derive(Debug)]
struct Shared {
    threshold: AtomicU8,
    handlers: Mutex<HandlerSet>,
}

/// What [`DiagnosticsLog::setup`] ended up installing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub level: Severity,
    /// Active log file, when the file sink is live.
    pub file_path: Option<PathBuf>,
    pub console: bool,
    /// Degraded-mode notices, also written to stderr.
    pub warnings: Vec<String>,
}

impl SetupReport {
    /// Both sinks disabled or unavailable.
    pub fn is_silent(&self) -> bool {
        self.file_path.is_none() && !self.console
    }
}

/// Outcome of an upstream API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCallStatus {
    Success,
    Failure,
}

impl ApiCallStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ApiCallStatus::Success => "success",
            ApiCallStatus::Failure => "failure",
        }
    }
}

impl From<bool> for ApiCallStatus {
    fn from(ok: bool) -> Self {
        if ok {
            ApiCallStatus::Success
        } else {
            ApiCallStatus::Failure
        }
    }
}

impl std::fmt::Display for ApiCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a [`LogContext`] from key-value pairs.
pub fn context<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> LogContext
where
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.to_string()))
        .collect()
}

/// Handle to the process logging facility.
///
/// Cheap to clone; clones and [`child`](Self::child) loggers share handlers
/// and threshold. Until [`setup`](Self::setup) runs the logger is silent.
#[derive(Debug, Clone)]
pub struct DiagnosticsLog {
    name: Arc<str>,
    shared: Arc<Shared>,
}

impl Default for DiagnosticsLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsLog {
    /// A silent logger with an INFO threshold.
    pub fn new() -> Self {
        Self {
            name: Arc::from(ROOT_LOGGER),
            shared: Arc::new(Shared {
                threshold: AtomicU8::new(Severity::Info as u8),
                handlers: Mutex::new(HandlerSet::default()),
            }),
        }
    }

    /// Create a logger and install handlers from `config`.
    pub fn from_config(config: &ConfigStore) -> (Self, SetupReport) {
        let log = Self::new();
        let report = log.setup(config);
        (log, report)
    }

    /// Logger named `<this>.<name>` sharing this logger's handlers.
    pub fn child(&self, name: &str) -> Self {
        Self {
            name: Arc::from(format!("{}.{name}", self.name)),
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // --- Setup ---

    /// Read the `logging` section and replace the handler set.
    ///
    /// Fields with the wrong shape fall back to their own defaults and are
    /// listed in the report.
    pub fn setup(&self, config: &ConfigStore) -> SetupReport {
        let (settings, rejected) = config.checked_logging_settings();
        self.install(&settings, None, rejected)
    }

    /// Replace the handler set from explicit settings; console goes to stdout.
    pub fn setup_with(&self, settings: &LoggingSettings) -> SetupReport {
        self.install(settings, None, Vec::new())
    }

    /// Same as [`setup_with`](Self::setup_with), with the console sink
    /// writing to `out` instead of stdout.
    pub fn setup_with_console(
        &self,
        settings: &LoggingSettings,
        out: Box<dyn Write + Send>,
    ) -> SetupReport {
        self.install(settings, Some(out), Vec::new())
    }

    fn install(
        &self,
        settings: &LoggingSettings,
        out: Option<Box<dyn Write + Send>>,
        mut warnings: Vec<String>,
    ) -> SetupReport {
        let level = Severity::from_name(&settings.level);

        if Severity::parse(&settings.level).is_none() {
            warnings.push(format!("Unknown log level '{}', using {level}", settings.level));
        }

        let format = LineFormat::new(&settings.format, &settings.date_format);
        if format.date_format() != settings.date_format {
            warnings.push(format!(
                "Invalid date_format '{}', using '{}'",
                settings.date_format,
                format.date_format()
            ));
        }

        if settings.file.enabled {
            let encoding = settings.file.encoding.to_ascii_lowercase().replace('_', "-");
            if encoding != "utf-8" && encoding != "utf8" {
                warnings.push(format!(
                    "Unsupported log encoding '{}', writing UTF-8",
                    settings.file.encoding
                ));
            }
        }

        let console = settings.console.enabled.then(|| {
            let sink = match out {
                Some(out) => ConsoleSink::with_writer(settings.console.colored, out),
                None => ConsoleSink::stdout(settings.console.colored),
            };
            ConsoleHandler {
                sink,
                format: format.clone(),
            }
        });

        // The file sink is opened under the handler lock, after the previous
        // one is flushed and dropped: no rollover can rename the file between
        // open and swap.
        let file_path = {
            let mut handlers = self.handlers();
            let mut previous = std::mem::take(&mut *handlers);
            if let Some(old) = previous.file.as_mut() {
                let _ = old.sink.flush();
            }
            drop(previous);

            let file = if settings.file.enabled {
                let path = settings.file.file_path();
                match RotatingFileSink::open(&path, settings.file.max_bytes, settings.file.backup_count)
                {
                    Ok(sink) => Some(FileHandler { sink, format }),
                    Err(e) => {
                        warnings.push(format!(
                            "Failed to set up file logging at {}: {e}",
                            path.display()
                        ));
                        None
                    }
                }
            } else {
                None
            };

            let file_path = file.as_ref().map(|f| f.sink.path().to_path_buf());
            *handlers = HandlerSet { file, console };
            self.shared.threshold.store(level as u8, Ordering::Release);
            file_path
        };

        for warning in &warnings {
            eprintln!("Warning: {warning}");
        }

        let report = SetupReport {
            level,
            console: settings.console.enabled,
            file_path,
            warnings,
        };

        self.info("Logging system initialized successfully");
        report
    }

    fn handlers(&self) -> MutexGuard<'_, HandlerSet> {
        self.shared
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // --- Threshold ---

    pub fn level(&self) -> Severity {
        Severity::from(self.shared.threshold.load(Ordering::Acquire))
    }

    /// Change the threshold without rebuilding handlers.
    pub fn set_level(&self, level: Severity) {
        self.shared.threshold.store(level as u8, Ordering::Release);
        self.info(format_args!("Logging level changed to {level}"));
    }

    /// [`set_level`](Self::set_level) by name; unknown names mean INFO.
    pub fn set_level_name(&self, name: &str) {
        self.set_level(Severity::from_name(name));
    }

    pub fn is_enabled_for(&self, level: Severity) -> bool {
        level >= self.level()
    }

    // --- Emission ---

    pub fn log(&self, level: Severity, message: impl Display) {
        if self.is_enabled_for(level) {
            self.emit(&self.name, level, message.to_string(), LogContext::new(), None);
        }
    }

    pub fn log_with(&self, level: Severity, message: impl Display, context: LogContext) {
        if self.is_enabled_for(level) {
            self.emit(&self.name, level, message.to_string(), context, None);
        }
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&self, message: impl Display) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: impl Display) {
        self.log(Severity::Critical, message);
    }

    pub fn debug_with(&self, message: impl Display, context: LogContext) {
        self.log_with(Severity::Debug, message, context);
    }

    pub fn info_with(&self, message: impl Display, context: LogContext) {
        self.log_with(Severity::Info, message, context);
    }

    pub fn warning_with(&self, message: impl Display, context: LogContext) {
        self.log_with(Severity::Warning, message, context);
    }

    pub fn error_with(&self, message: impl Display, context: LogContext) {
        self.log_with(Severity::Error, message, context);
    }

    pub fn critical_with(&self, message: impl Display, context: LogContext) {
        self.log_with(Severity::Critical, message, context);
    }

    /// ERROR record with the error's source chain and a captured trace.
    pub fn exception(&self, message: impl Display, err: &(dyn std::error::Error + 'static)) {
        if !self.is_enabled_for(Severity::Error) {
            return;
        }
        let mut text = format!("{message}: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str(&format!(" (caused by: {cause})"));
            source = cause.source();
        }
        self.emit_traced(Severity::Error, text);
    }

    /// Emit an ERROR record followed by a captured stack trace.
    pub(crate) fn emit_traced(&self, level: Severity, message: String) {
        if self.is_enabled_for(level) {
            let trace = Backtrace::force_capture().to_string();
            self.emit(&self.name, level, message, LogContext::new(), Some(&trace));
        }
    }

    /// Emit under an explicit logger name; used by the tracing bridge.
    pub(crate) fn emit_as(&self, logger: &str, level: Severity, message: String, context: LogContext) {
        if self.is_enabled_for(level) {
            self.emit(logger, level, message, context, None);
        }
    }

    fn emit(
        &self,
        logger: &str,
        level: Severity,
        message: String,
        context: LogContext,
        trace: Option<&str>,
    ) {
        let record = LogRecord::new(logger, level, message).with_context(context);
        let mut handlers = self.handlers();

        if let Some(file) = handlers.file.as_mut() {
            let line = with_trace(file.format.render(&record, level.name()), trace);
            if let Err(e) = file.sink.write_line(&line) {
                eprintln!(
                    "Warning: failed to write log file {}: {e}",
                    file.sink.path().display()
                );
            }
        }

        if let Some(console) = handlers.console.as_mut() {
            let levelname = console.sink.level_name(level);
            let line = with_trace(console.format.render(&record, &levelname), trace);
            if let Err(e) = console.sink.write_line(&line) {
                eprintln!("Warning: failed to write console log: {e}");
            }
        }
    }

    // --- Structured helpers ---

    /// `API Call - <service> | <endpoint> | <status> (<secs>s)` at INFO.
    pub fn log_api_call(
        &self,
        service: &str,
        endpoint: &str,
        status: ApiCallStatus,
        duration: Option<Duration>,
    ) {
        metrics::record_api_call(service, status.as_str(), duration);
        if !self.is_enabled_for(Severity::Info) {
            return;
        }
        let duration = duration
            .map(|d| format!(" ({:.2}s)", d.as_secs_f64()))
            .unwrap_or_default();
        self.info(format_args!("API Call - {service} | {endpoint} | {status}{duration}"));
    }

    /// `User Action - <action> | k=v, ...` at INFO.
    pub fn log_user_action(&self, action: &str, details: Option<&LogContext>) {
        if !self.is_enabled_for(Severity::Info) {
            return;
        }
        self.info(format_args!("User Action - {action}{}", detail_suffix(details)));
    }

    /// `Performance - <operation> | <secs>s | k=v, ...` at INFO.
    pub fn log_performance(&self, operation: &str, duration: Duration, details: Option<&LogContext>) {
        metrics::record_operation(operation, duration);
        if !self.is_enabled_for(Severity::Info) {
            return;
        }
        self.info(format_args!(
            "Performance - {operation} | {:.2}s{}",
            duration.as_secs_f64(),
            detail_suffix(details)
        ));
    }

    /// `Error - <Type>: <message> | Context: k=v | k=v` at ERROR, with a trace.
    ///
    /// Taxonomy errors are named by kind, anything else as `Error`. Use
    /// [`log_typed_error_with_context`](Self::log_typed_error_with_context)
    /// to name a concrete type.
    pub fn log_error_with_context(
        &self,
        err: &(dyn std::error::Error + 'static),
        context: Option<&LogContext>,
    ) {
        self.log_error_with_context_as("Error", err, context);
    }

    /// [`log_error_with_context`](Self::log_error_with_context), naming a
    /// non-taxonomy error by its Rust type.
    pub fn log_typed_error_with_context<E>(&self, err: &E, context: Option<&LogContext>)
    where
        E: std::error::Error + 'static,
    {
        if self.is_enabled_for(Severity::Error) {
            self.log_error_with_context_as(&short_type_name::<E>(), err, context);
        }
    }

    /// Like [`log_error_with_context`](Self::log_error_with_context), with
    /// `fallback` naming errors outside the taxonomy.
    pub fn log_error_with_context_as(
        &self,
        fallback: &str,
        err: &(dyn std::error::Error + 'static),
        context: Option<&LogContext>,
    ) {
        if !self.is_enabled_for(Severity::Error) {
            return;
        }
        let type_name = match err.downcast_ref::<TextMorphError>() {
            Some(known) => known.kind().name(),
            None => fallback,
        };

        let mut message = format!("Error - {type_name}: {err}");
        if let Some(context) = context.filter(|c| !c.is_empty()) {
            message.push_str(" | Context: ");
            message.push_str(&join_pairs(context, " | "));
        }
        self.emit_traced(Severity::Error, message);
    }

    // --- File access ---

    /// Path of the active file sink, if one is installed.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.handlers()
            .file
            .as_ref()
            .map(|f| f.sink.path().to_path_buf())
    }

    /// Last `n` lines of the active log file; empty when there is none.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let path = {
            let mut handlers = self.handlers();
            match handlers.file.as_mut() {
                Some(file) => {
                    let _ = file.sink.flush();
                    file.sink.path().to_path_buf()
                }
                None => return Vec::new(),
            }
        };
        tail_lines(&path, n).unwrap_or_default()
    }

    /// Truncate the active log file. A no-op without a file sink.
    pub fn clear(&self) -> Result<()> {
        let cleared = {
            let mut handlers = self.handlers();
            match handlers.file.as_mut() {
                Some(file) => file.sink.truncate().map(|()| true).map_err(|e| {
                    TextMorphError::file_operation(
                        format!("Failed to clear log file: {e}"),
                        Some(file.sink.path().to_path_buf()),
                    )
                })?,
                None => false,
            }
        };
        if cleared {
            self.info("Log file cleared");
        }
        Ok(())
    }

    pub fn flush(&self) {
        if let Some(file) = self.handlers().file.as_mut() {
            let _ = file.sink.flush();
        }
    }
}

fn with_trace(mut line: String, trace: Option<&str>) -> String {
    if let Some(trace) = trace {
        for frame in trace.lines().filter(|l| !l.trim().is_empty()) {
            line.push_str("\n    ");
            line.push_str(frame.trim_end());
        }
    }
    line
}

fn detail_suffix(details: Option<&LogContext>) -> String {
    match details {
        Some(details) if !details.is_empty() => format!(" | {}", join_pairs(details, ", ")),
        _ => String::new(),
    }
}

/// `std::io::error::Error` → `Error`, `foo::Wrapper<bar::T>` → `Wrapper`.
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
