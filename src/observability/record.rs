//! Log records and line formatting.

use std::collections::BTreeMap;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

use crate::config::schema::{DEFAULT_DATE_FORMAT, DEFAULT_LOG_FORMAT};
use crate::observability::level::Severity;

/// Structured key-value context attached to a record.
pub type LogContext = BTreeMap<String, String>;

/// A single log event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub logger: String,
    pub level: Severity,
    pub message: String,
    pub context: LogContext,
}

impl LogRecord {
    pub fn new(logger: impl Into<String>, level: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            logger: logger.into(),
            level,
            message: message.into(),
            context: LogContext::new(),
        }
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    /// Message with context appended as ` | k=v, k=v`.
    pub fn full_message(&self) -> String {
        if self.context.is_empty() {
            return self.message.clone();
        }
        format!("{} | {}", self.message, join_pairs(&self.context, ", "))
    }
}

/// Render `k=v` pairs joined by `separator`, in key order.
pub fn join_pairs(context: &LogContext, separator: &str) -> String {
    context
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Line template plus timestamp pattern.
///
/// The template understands `%(asctime)s`, `%(name)s`, `%(levelname)s`,
/// `%(levelno)s` and `%(message)s`; `%%` is a literal percent sign. Unknown
/// tokens are copied through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    template: String,
    date_format: String,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_LOG_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl LineFormat {
    /// An invalid `date_format` falls back to the default pattern.
    pub fn new(template: impl Into<String>, date_format: impl Into<String>) -> Self {
        let date_format = date_format.into();
        let date_format = if is_valid_strftime(&date_format) {
            date_format
        } else {
            DEFAULT_DATE_FORMAT.to_string()
        };
        Self {
            template: template.into(),
            date_format,
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Render a record; `levelname` lets the console sink pass a coloured name.
    pub fn render(&self, record: &LogRecord, levelname: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + record.message.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('%') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some(after) = tail.strip_prefix("%%") {
                out.push('%');
                rest = after;
                continue;
            }

            let token = tail
                .strip_prefix("%(")
                .and_then(|inner| inner.find(")s").map(|end| (&inner[..end], &inner[end + 2..])));

            match token {
                Some((key, after)) => {
                    match key {
                        "asctime" => out.push_str(
                            &record.timestamp.format(&self.date_format).to_string(),
                        ),
                        "name" => out.push_str(&record.logger),
                        "levelname" => out.push_str(levelname),
                        "levelno" => out.push_str(&(record.level as u8).to_string()),
                        "message" => out.push_str(&record.full_message()),
                        _ => out.push_str(&tail[..tail.len() - after.len()]),
                    }
                    rest = after;
                }
                None => {
                    out.push('%');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn is_valid_strftime(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}
