//! Parsed configuration tree.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Mapping node of a configuration tree.
pub type ConfigMap = Map<String, Value>;

/// An immutable hierarchical configuration document.
///
/// Nodes are mappings, ordered sequences or scalars. A document is built once
/// from a parsed file and replaced wholesale on reload, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: ConfigMap,
}

impl ConfigDocument {
    /// Wrap a top-level mapping.
    pub fn new(root: ConfigMap) -> Self {
        Self { root }
    }

    /// Build a document from any JSON value; `None` unless the value is a mapping.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    pub fn root(&self) -> &ConfigMap {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walk a dotted path such as `api.huggingface.timeout`.
    ///
    /// Returns `None` as soon as a segment is missing or a non-mapping value
    /// would have to be indexed further.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Deserialize the value at `path` into `T`.
    ///
    /// `None` when the path is absent or the value has the wrong shape.
    pub fn lookup_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let value = self.lookup(path)?;
        T::deserialize(value).ok()
    }
}
