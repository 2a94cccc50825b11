//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::document::ConfigDocument;
use crate::error::{Result, TextMorphError};

/// On-disk syntax of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from the file extension; YAML when unknown.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => DocumentFormat::Toml,
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parse document text in the given format.
///
/// Fails when the text is unparsable, empty, or its top level is not a mapping.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<ConfigDocument> {
    if is_blank(content) {
        return Err(TextMorphError::configuration("Configuration file is empty"));
    }

    let value: Value = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
            TextMorphError::configuration(format!("Error parsing YAML config: {e}"))
        })?,
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| {
            TextMorphError::configuration(format!("Error parsing TOML config: {e}"))
        })?,
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| {
            TextMorphError::configuration(format!("Error parsing JSON config: {e}"))
        })?,
    };

    if value.is_null() {
        return Err(TextMorphError::configuration("Configuration file is empty"));
    }

    let document = ConfigDocument::from_value(value).ok_or_else(|| {
        TextMorphError::configuration("Configuration root must be a mapping of sections")
    })?;

    if document.is_empty() {
        return Err(TextMorphError::configuration("Configuration file is empty"));
    }

    Ok(document)
}

/// Only whitespace, comments and YAML document markers.
fn is_blank(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Read and parse a configuration file.
pub fn load_document(path: &Path) -> Result<ConfigDocument> {
    if !path.exists() {
        return Err(TextMorphError::configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        TextMorphError::configuration(format!("Error loading configuration: {e}"))
    })?;

    let document = parse_document(&content, DocumentFormat::from_path(path))?;
    tracing::debug!(
        path = %path.display(),
        sections = document.root().len(),
        "Configuration document parsed"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("config.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("config.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("config.toml")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("config.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("config")), DocumentFormat::Yaml);
    }

    #[test]
    fn test_parse_yaml() {
        let doc = parse_document("limits:\n  max_input_length: 500\n", DocumentFormat::Yaml)
            .unwrap();
        assert_eq!(doc.lookup("limits.max_input_length"), Some(&json!(500)));
    }

    #[test]
    fn test_parse_toml() {
        let doc = parse_document(
            "[api.groq]\nmodel_name = \"llama-3.1-8b-instant\"\n",
            DocumentFormat::Toml,
        )
        .unwrap();
        assert_eq!(
            doc.lookup("api.groq.model_name"),
            Some(&json!("llama-3.1-8b-instant"))
        );
    }

    #[test]
    fn test_empty_documents_rejected() {
        for (content, format) in [
            ("", DocumentFormat::Yaml),
            ("# only a comment\n", DocumentFormat::Yaml),
            ("{}", DocumentFormat::Json),
            ("", DocumentFormat::Toml),
        ] {
            let err = parse_document(content, format).unwrap_err();
            assert_eq!(err.code(), "CONFIG_ERROR");
            assert_eq!(err.to_string(), "Configuration file is empty");
        }
    }

    #[test]
    fn test_unparsable_document() {
        let err = parse_document("app: [unclosed", DocumentFormat::Yaml).unwrap_err();
        assert!(err.to_string().starts_with("Error parsing YAML config"));
    }

    #[test]
    fn test_non_mapping_root() {
        let err = parse_document("- a\n- b\n", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, TextMorphError::Configuration { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
