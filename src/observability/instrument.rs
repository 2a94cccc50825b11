//! Execution tracing.
//!
//! Wrap an operation so that entry, completion and failure are logged with
//! elapsed time. The wrapped operation's result (or panic) passes through
//! unchanged.

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::observability::level::Severity;
use crate::observability::logging::DiagnosticsLog;

impl DiagnosticsLog {
    /// Run `op` once under tracing.
    pub fn run_traced<T, E, F>(&self, name: &str, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        let start = Instant::now();
        self.debug(format_args!("Executing {name}"));

        match panic::catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => {
                let secs = start.elapsed().as_secs_f64();
                self.debug(format_args!("Completed {name} in {secs:.2}s"));
                Ok(value)
            }
            Ok(Err(err)) => {
                let secs = start.elapsed().as_secs_f64();
                self.emit_traced(
                    Severity::Error,
                    format!("Error in {name} after {secs:.2}s: {err}"),
                );
                Err(err)
            }
            Err(payload) => {
                let secs = start.elapsed().as_secs_f64();
                self.emit_traced(
                    Severity::Error,
                    format!("Error in {name} after {secs:.2}s: panicked: {}", panic_message(&*payload)),
                );
                panic::resume_unwind(payload)
            }
        }
    }

    /// Wrap a zero-argument operation.
    pub fn traced<T, E, F>(&self, name: impl Into<String>, mut op: F) -> impl FnMut() -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
    {
        let log = self.clone();
        let name = name.into();
        move || log.run_traced(&name, &mut op)
    }

    /// Wrap an operation taking one argument; pass a tuple for several.
    pub fn instrument<A, T, E, F>(&self, name: impl Into<String>, op: F) -> impl Fn(A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
        E: Display,
    {
        let log = self.clone();
        let name = name.into();
        move |arg| log.run_traced(&name, || op(arg))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use crate::config::schema::{ConsoleSinkSettings, FileSinkSettings, LoggingSettings};
    use crate::observability::logging::DiagnosticsLog;

    fn traced_log(dir: &std::path::Path) -> DiagnosticsLog {
        let settings = LoggingSettings {
            level: "DEBUG".to_string(),
            format: "%(levelname)s %(message)s".to_string(),
            file: FileSinkSettings {
                path: dir.to_path_buf(),
                filename: "trace.log".to_string(),
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
        log
    }

    fn header_lines(dir: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("trace.log"))
            .unwrap()
            .lines()
            .filter(|l| !l.starts_with(' '))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_success_logged_at_debug() {
        let dir = tempfile::tempdir().unwrap();
        let log = traced_log(dir.path());

        let mut calls = 0;
        let mut op = log.traced("count", || -> Result<u32, String> {
            calls += 1;
            Ok(calls)
        });
        assert_eq!(op(), Ok(1));
        assert_eq!(op(), Ok(2));
        drop(op);

        let lines = header_lines(dir.path());
        assert_eq!(lines[1], "DEBUG Executing count");
        assert!(lines[2].starts_with("DEBUG Completed count in "));
        assert!(lines[2].ends_with('s'));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_error_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let log = traced_log(dir.path());

        let op = log.instrument("divide", |(a, b): (u32, u32)| {
            a.checked_div(b).ok_or_else(|| "division by zero".to_string())
        });
        assert_eq!(op((6, 3)), Ok(2));
        assert_eq!(op((1, 0)), Err("division by zero".to_string()));

        let lines = header_lines(dir.path());
        let failure = lines.last().unwrap();
        assert!(failure.starts_with("ERROR Error in divide after "));
        assert!(failure.ends_with(": division by zero"));
    }

    #[test]
    fn test_panic_resumed() {
        let dir = tempfile::tempdir().unwrap();
        let log = traced_log(dir.path());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            log.run_traced("explode", || -> Result<(), String> { panic!("boom") })
        }));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));

        let lines = header_lines(dir.path());
        assert!(lines.last().unwrap().ends_with("panicked: boom"));
    }
}
