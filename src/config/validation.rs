//! Startup validation of the configuration document.
//!
//! # Responsibilities
//! - Check that every required section is present before serving requests
//! - Name the first missing dotted path in the failure
//!
//! # Design Decisions
//! - Runs once at startup so that absent sections fail fast instead of
//!   surfacing as odd defaults deep inside request handling
//! - A key that is present but null counts as missing

use crate::config::document::ConfigDocument;
use crate::error::{Result, TextMorphError};

/// Sections a usable configuration must define.
pub const REQUIRED_KEYS: &[&str] = &[
    "app",
    "api.huggingface",
    "api.groq",
    "summarization",
    "paraphrasing",
    "limits",
    "logging",
];

/// Optional sections recognised by the accessors.
pub const OPTIONAL_KEYS: &[&str] = &[
    "theme",
    "features",
    "cache",
    "export",
    "performance",
    "error_messages",
    "success_messages",
];

/// Fail with a [`TextMorphError::Configuration`] naming the first missing path.
pub fn validate_required(document: &ConfigDocument, required: &[&str]) -> Result<()> {
    for key in required {
        match document.lookup(key) {
            Some(value) if !value.is_null() => {}
            _ => {
                return Err(TextMorphError::configuration_key(
                    format!("Required configuration key missing: {key}"),
                    *key,
                ))
            }
        }
    }
    Ok(())
}
