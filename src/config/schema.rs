//! Typed views of well-known configuration sections.
//!
//! The document itself stays untyped. Each struct is resolved one key at a
//! time through [`FieldReader`], so a mis-shaped field falls back to its own
//! default without discarding its siblings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::document::ConfigDocument;

/// Reads individual keys from a document, collecting rejected values.
#[derive(Debug)]
pub struct FieldReader<'a> {
    document: &'a ConfigDocument,
    rejected: Vec<String>,
}

impl<'a> FieldReader<'a> {
    pub fn new(document: &'a ConfigDocument) -> Self {
        Self {
            document,
            rejected: Vec::new(),
        }
    }

    /// Value at `path`, or `default` when absent or of the wrong shape.
    ///
    /// A present value that does not deserialize as `T` is recorded.
    pub fn read<T: DeserializeOwned>(&mut self, path: &str, default: T) -> T {
        let document = self.document;
        match document.lookup(path) {
            None => default,
            Some(value) => match T::deserialize(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    self.rejected
                        .push(format!("Invalid value for '{path}' ({e}), using default"));
                    default
                }
            },
        }
    }

    /// One notice per rejected key, in read order.
    pub fn into_rejected(self) -> Vec<String> {
        self.rejected
    }
}

/// `logging` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Severity name (DEBUG, INFO, WARNING, ERROR, CRITICAL).
    pub level: String,

    /// Line template using `%(asctime)s`, `%(name)s`, `%(levelname)s`, `%(message)s`.
    pub format: String,

    /// strftime pattern for `%(asctime)s`.
    pub date_format: String,

    pub file: FileSinkSettings,

    pub console: ConsoleSinkSettings,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            format: DEFAULT_LOG_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            file: FileSinkSettings::default(),
            console: ConsoleSinkSettings::default(),
        }
    }
}

impl LoggingSettings {
    /// Resolve the `logging` section key by key.
    pub fn resolve(document: &ConfigDocument) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let mut reader = FieldReader::new(document);
        let settings = Self {
            level: reader.read("logging.level", defaults.level),
            format: reader.read("logging.format", defaults.format),
            date_format: reader.read("logging.date_format", defaults.date_format),
            file: FileSinkSettings {
                enabled: reader.read("logging.file.enabled", defaults.file.enabled),
                path: reader.read("logging.file.path", defaults.file.path),
                filename: reader.read("logging.file.filename", defaults.file.filename),
                max_bytes: reader.read("logging.file.max_bytes", defaults.file.max_bytes),
                backup_count: reader.read("logging.file.backup_count", defaults.file.backup_count),
                encoding: reader.read("logging.file.encoding", defaults.file.encoding),
            },
            console: ConsoleSinkSettings {
                enabled: reader.read("logging.console.enabled", defaults.console.enabled),
                colored: reader.read("logging.console.colored", defaults.console.colored),
            },
        };
        (settings, reader.into_rejected())
    }
}

pub const DEFAULT_LOG_FORMAT: &str = "%(asctime)s - %(name)s - %(levelname)s - %(message)s";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `logging.file` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FileSinkSettings {
    pub enabled: bool,

    /// Directory holding the log file (created if absent).
    pub path: PathBuf,

    pub filename: String,

    /// Rotate once the active file would exceed this many bytes (0 disables).
    pub max_bytes: u64,

    /// Rotated generations to keep.
    pub backup_count: usize,

    pub encoding: String,
}

impl FileSinkSettings {
    pub fn file_path(&self) -> PathBuf {
        self.path.join(&self.filename)
    }
}

impl Default for FileSinkSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("logs"),
            filename: "text_morph.log".to_string(),
            max_bytes: 10_485_760, // 10MB
            backup_count: 5,
            encoding: "utf-8".to_string(),
        }
    }
}

/// `logging.console` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConsoleSinkSettings {
    pub enabled: bool,

    /// ANSI colour per level name.
    pub colored: bool,
}

impl Default for ConsoleSinkSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// `api.<service>` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiServiceSettings {
    pub model_name: String,

    pub timeout: u64,

    pub base_url: Option<String>,

    pub max_retries: u32,
}

impl Default for ApiServiceSettings {
    fn default() -> Self {
        Self {
            model_name: String::new(),
            timeout: 60,
            base_url: None,
            max_retries: 3,
        }
    }
}

impl ApiServiceSettings {
    /// Resolve `api.<service>` key by key.
    pub fn resolve(document: &ConfigDocument, service: &str) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let mut reader = FieldReader::new(document);
        let settings = Self {
            model_name: reader.read(&format!("api.{service}.model_name"), defaults.model_name),
            timeout: reader.read(&format!("api.{service}.timeout"), defaults.timeout),
            base_url: reader.read(&format!("api.{service}.base_url"), defaults.base_url),
            max_retries: reader.read(&format!("api.{service}.max_retries"), defaults.max_retries),
        };
        (settings, reader.into_rejected())
    }
}

/// `limits` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsSettings {
    pub max_input_length: usize,

    pub min_input_length: usize,
}

impl Default for LimitsSettings {
    fn default() -> Self {
        Self {
            max_input_length: 10_000,
            min_input_length: 50,
        }
    }
}

impl LimitsSettings {
    /// Resolve the `limits` section key by key.
    pub fn resolve(document: &ConfigDocument) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let mut reader = FieldReader::new(document);
        let settings = Self {
            max_input_length: reader.read("limits.max_input_length", defaults.max_input_length),
            min_input_length: reader.read("limits.min_input_length", defaults.min_input_length),
        };
        (settings, reader.into_rejected())
    }
}
