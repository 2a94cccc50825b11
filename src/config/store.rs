//! Shared, read-mostly configuration store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::document::{ConfigDocument, ConfigMap};
use crate::config::loader::load_document;
use crate::config::schema::{ApiServiceSettings, LimitsSettings, LoggingSettings};
use crate::config::template;
use crate::config::validation::{validate_required, REQUIRED_KEYS};
use crate::error::Result;

const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";
const DEFAULT_SUCCESS_MESSAGE: &str = "Success!";

/// Owns the live [`ConfigDocument`] loaded from one file.
///
/// Readers never observe a half-updated tree: [`reload`](Self::reload) parses
/// the replacement completely and then swaps the document reference in one
/// atomic store.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    document: ArcSwap<ConfigDocument>,
    generation: AtomicU64,
}

impl ConfigStore {
    /// Load the document at `path`.
    ///
    /// Any failure is a fatal [`TextMorphError::Configuration`](crate::TextMorphError::Configuration):
    /// callers must halt rather than continue with partial configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = load_document(&path)?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(Self::from_document(path, document))
    }

    /// Build a store around an already-parsed document.
    pub fn from_document(path: impl Into<PathBuf>, document: ConfigDocument) -> Self {
        Self {
            path: path.into(),
            document: ArcSwap::from_pointee(document),
            generation: AtomicU64::new(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Incremented by every successful reload, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// The current document, for reading several keys from one consistent tree.
    pub fn snapshot(&self) -> Arc<ConfigDocument> {
        self.document.load_full()
    }

    /// Discard the held document and load the file again from the original path.
    ///
    /// On failure the previous document stays live and the error is returned.
    pub fn reload(&self) -> Result<()> {
        let document = load_document(&self.path)?;
        self.document.store(Arc::new(document));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(path = %self.path.display(), generation, "Configuration reloaded");
        Ok(())
    }

    /// Raw value at a dotted path.
    pub fn get(&self, key_path: &str) -> Option<Value> {
        self.document.load().lookup(key_path).cloned()
    }

    /// Raw value at a dotted path, or `default` when absent.
    pub fn get_or(&self, key_path: &str, default: Value) -> Value {
        self.get(key_path).unwrap_or(default)
    }

    /// Typed value at a dotted path.
    ///
    /// Returns `default` when the path is absent or holds a value that does
    /// not deserialize as `T`. Never fails.
    pub fn get_as<T: DeserializeOwned>(&self, key_path: &str, default: T) -> T {
        self.document.load().lookup_as(key_path).unwrap_or(default)
    }

    /// Deserialize a whole section into a schema struct, or its default.
    ///
    /// All or nothing: one mis-shaped field yields `T::default()`. The
    /// `*_settings` accessors resolve per key instead.
    pub fn section<T: DeserializeOwned + Default>(&self, key_path: &str) -> T {
        self.document.load().lookup_as(key_path).unwrap_or_default()
    }

    /// Check that all [`REQUIRED_KEYS`] are present.
    pub fn validate(&self) -> Result<()> {
        self.validate_keys(REQUIRED_KEYS)
    }

    /// Check that every listed dotted path is present.
    pub fn validate_keys(&self, required: &[&str]) -> Result<()> {
        validate_required(&self.document.load(), required)
    }

    // --- Section projections ---

    fn mapping(&self, key_path: &str) -> ConfigMap {
        self.get_as(key_path, ConfigMap::new())
    }

    pub fn app_config(&self) -> ConfigMap {
        self.mapping("app")
    }

    /// `api.<service>`, e.g. `huggingface` or `groq`.
    pub fn api_config(&self, service: &str) -> ConfigMap {
        self.mapping(&format!("api.{service}"))
    }

    /// `summarization.<method>.<length>`, e.g. `abstractive.medium`.
    pub fn summarization_params(&self, method: &str, length: &str) -> ConfigMap {
        self.mapping(&format!("summarization.{method}.{length}"))
    }

    pub fn paraphrasing_params(&self) -> ConfigMap {
        self.mapping("paraphrasing")
    }

    pub fn limits(&self) -> ConfigMap {
        self.mapping("limits")
    }

    pub fn logging_config(&self) -> ConfigMap {
        self.mapping("logging")
    }

    pub fn theme_colors(&self) -> ConfigMap {
        self.mapping("theme.colors")
    }

    pub fn cache_config(&self) -> ConfigMap {
        self.mapping("cache")
    }

    pub fn export_config(&self) -> ConfigMap {
        self.mapping("export")
    }

    pub fn performance_config(&self) -> ConfigMap {
        self.mapping("performance")
    }

    pub fn is_feature_enabled(&self, feature: &str) -> bool {
        self.get_as(&format!("features.{feature}"), false)
    }

    // --- Typed sections (resolved key by key) ---

    pub fn logging_settings(&self) -> LoggingSettings {
        self.checked_logging_settings().0
    }

    /// Logging settings plus one notice per rejected field.
    pub fn checked_logging_settings(&self) -> (LoggingSettings, Vec<String>) {
        LoggingSettings::resolve(&self.document.load())
    }

    pub fn api_settings(&self, service: &str) -> ApiServiceSettings {
        self.checked_api_settings(service).0
    }

    pub fn checked_api_settings(&self, service: &str) -> (ApiServiceSettings, Vec<String>) {
        ApiServiceSettings::resolve(&self.document.load(), service)
    }

    pub fn limits_settings(&self) -> LimitsSettings {
        self.checked_limits_settings().0
    }

    pub fn checked_limits_settings(&self) -> (LimitsSettings, Vec<String>) {
        LimitsSettings::resolve(&self.document.load())
    }

    // --- Common scalars ---

    pub fn app_name(&self) -> String {
        self.get_as("app.name", "Text Morph".to_string())
    }

    pub fn app_version(&self) -> String {
        self.get_as("app.version", "1.0.0".to_string())
    }

    pub fn hf_model(&self) -> String {
        self.get_as(
            "api.huggingface.model_name",
            "facebook/bart-large-cnn".to_string(),
        )
    }

    pub fn groq_model(&self) -> String {
        self.get_as("api.groq.model_name", "llama-3.1-8b-instant".to_string())
    }

    /// Request timeout for `service` in seconds.
    pub fn timeout(&self, service: &str) -> u64 {
        self.get_as(&format!("api.{service}.timeout"), 60)
    }

    pub fn max_input_length(&self) -> usize {
        self.get_as("limits.max_input_length", 10_000)
    }

    pub fn is_file_logging_enabled(&self) -> bool {
        self.get_as("logging.file.enabled", true)
    }

    // --- Messages ---

    /// `error_messages.<kind>` with placeholders filled from `args`.
    pub fn error_message(&self, kind: &str, args: &[(&str, &str)]) -> String {
        self.message(&format!("error_messages.{kind}"), DEFAULT_ERROR_MESSAGE, args)
    }

    /// `success_messages.<kind>` with placeholders filled from `args`.
    pub fn success_message(&self, kind: &str, args: &[(&str, &str)]) -> String {
        self.message(&format!("success_messages.{kind}"), DEFAULT_SUCCESS_MESSAGE, args)
    }

    /// Display text never fails: an unrenderable template comes back verbatim.
    fn message(&self, key_path: &str, fallback: &str, args: &[(&str, &str)]) -> String {
        let template = self.get_as(key_path, fallback.to_string());
        let args: HashMap<&str, &str> = args.iter().copied().collect();

        match template::render(&template, &args) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(key = key_path, error = %e, "Message template left unsubstituted");
                template
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(value: Value) -> ConfigStore {
        ConfigStore::from_document("memory.yaml", ConfigDocument::from_value(value).unwrap())
    }

    #[test]
    fn test_get_with_defaults() {
        let store = store(json!({ "limits": { "max_input_length": 500 } }));
        assert_eq!(store.get_as("limits.max_input_length", 10000), 500);
        assert_eq!(store.get_as("limits.min_input_length", 50), 50);
        assert_eq!(store.get_or("limits.nope", json!("x")), json!("x"));
        assert_eq!(store.get("limits.max_input_length.deeper"), None);
    }

    #[test]
    fn test_get_as_wrong_shape_uses_default() {
        let store = store(json!({ "features": { "enable_export": "yes" } }));
        assert!(!store.is_feature_enabled("enable_export"));
        assert!(!store.is_feature_enabled("missing"));
    }

    #[test]
    fn test_projections_default_to_empty_mapping() {
        let store = store(json!({
            "api": { "groq": { "model_name": "llama", "timeout": 30 } },
            "limits": 5
        }));
        assert_eq!(store.api_config("groq").get("timeout"), Some(&json!(30)));
        assert!(store.api_config("huggingface").is_empty());
        assert!(store.limits().is_empty());
        assert!(store.summarization_params("abstractive", "short").is_empty());
        assert_eq!(store.timeout("groq"), 30);
        assert_eq!(store.timeout("huggingface"), 60);
        assert_eq!(store.groq_model(), "llama");
        assert_eq!(store.hf_model(), "facebook/bart-large-cnn");
    }

    #[test]
    fn test_error_message_substitution() {
        let store = store(json!({
            "error_messages": {
                "text_too_long": "Text has {current} characters, limit is {max}",
                "broken": "Hello {user}"
            }
        }));
        assert_eq!(
            store.error_message("text_too_long", &[("current", "15000"), ("max", "10000")]),
            "Text has 15000 characters, limit is 10000"
        );
        assert_eq!(store.error_message("broken", &[]), "Hello {user}");
        assert_eq!(store.error_message("unknown", &[]), "An error occurred");
        assert_eq!(store.success_message("saved", &[]), "Success!");
    }

    #[test]
    fn test_typed_sections() {
        let store = store(json!({
            "logging": { "level": "DEBUG", "console": { "colored": false } },
            "limits": { "min_input_length": 20 }
        }));
        let logging = store.logging_settings();
        assert_eq!(logging.level, "DEBUG");
        assert!(!logging.console.colored);
        assert!(logging.console.enabled);
        assert_eq!(store.limits_settings().min_input_length, 20);
        assert_eq!(store.limits_settings().max_input_length, 10_000);
    }

    #[test]
    fn test_snapshot_survives_reload_failure() {
        let store = store(json!({ "app": { "name": "Memory" } }));
        let before = store.snapshot();
        assert!(store.reload().is_err());
        assert_eq!(store.app_name(), "Memory");
        assert_eq!(store.generation(), 1);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }
}
