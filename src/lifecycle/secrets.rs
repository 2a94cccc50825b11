//! API key resolution.
//!
//! The process environment wins; a local `KEY=VALUE` secrets file (the
//! `.env` convention) is consulted second.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Conventional variable for the Hugging Face inference key.
pub const HF_API_KEY_VAR: &str = "HF_API_KEY";
/// Conventional variable for the Groq key.
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("{var} is not set in the environment or the secrets file")]
    Missing { var: String },

    #[error("failed to read secrets file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// An API key whose `Debug` output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Resolve `var` from the environment, then from `secrets_file`.
///
/// Empty values count as absent. A secrets file that does not exist is
/// skipped; one that exists but cannot be read or parsed is an error. The
/// file is only read, never loaded into the process environment.
pub fn load_api_key(var: &str, secrets_file: Option<&Path>) -> Result<ApiKey, SecretError> {
    if let Some(value) = std::env::var(var).ok().filter(|v| !v.trim().is_empty()) {
        return Ok(ApiKey(value));
    }

    if let Some(path) = secrets_file {
        if let Some(value) = lookup_file(path, var)? {
            tracing::debug!(var, path = %path.display(), "API key loaded from secrets file");
            return Ok(ApiKey(value));
        }
    }

    Err(SecretError::Missing {
        var: var.to_string(),
    })
}

/// Last non-empty assignment to `var` in a dotenv file.
fn lookup_file(path: &Path, var: &str) -> Result<Option<String>, SecretError> {
    let unreadable = |source| SecretError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(None),
        Err(e) => return Err(unreadable(e)),
    };

    let mut found = None;
    for entry in entries {
        let (key, value) = entry.map_err(unreadable)?;
        if key == var && !value.trim().is_empty() {
            found = Some(value);
        }
    }
    Ok(found)
}
