//! Structured documents: a format-independent tree for palettes and themes.
//!
//! Palettes are arbitrarily nested and have no fixed schema, so they are
//! read into a [`Node`] tree rather than a typed struct. A node is either a
//! string [`Scalar`](Node::Scalar), an ordered [`Mapping`](Node::Mapping), a
//! [`Sequence`](Node::Sequence), or something hexguard never looks at
//! (numbers, booleans, null).
//!
//! Both JSON and YAML are accepted. The format is picked from the file
//! extension:
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.yaml`, `.yml` | YAML |
//! | anything else | JSON |
//!
//! Key order of the source document is preserved, so anything derived from
//! a walk over the tree comes out in document order.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{HexguardError, Result};

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a path's extension. Unknown extensions are JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }

    /// Deserializes `content` into any serde type.
    pub fn parse_as<T: DeserializeOwned>(self, content: &str) -> std::result::Result<T, String> {
        match self {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// One node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A string leaf.
    Scalar(String),
    /// Key/value entries in document order.
    Mapping(Vec<(String, Node)>),
    /// An ordered list of nodes.
    Sequence(Vec<Node>),
    /// Numbers, booleans and nulls.
    Other,
}

impl Node {
    /// Parses document content in the given format.
    pub fn parse(content: &str, format: DocumentFormat) -> std::result::Result<Self, String> {
        match format {
            DocumentFormat::Json => {
                let value: serde_json::Value = format.parse_as(content)?;
                Ok(Self::from(value))
            }
            DocumentFormat::Yaml => {
                let value: serde_yaml::Value = format.parse_as(content)?;
                Ok(Self::from(value))
            }
        }
    }

    /// Reads and parses a document, picking the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`HexguardError::Io`] if the file cannot be read and
    /// [`HexguardError::Parse`] if its content is not valid JSON/YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| HexguardError::io(path, e))?;
        Self::parse(&content, DocumentFormat::from_path(path))
            .map_err(|message| HexguardError::parse(Some(path.to_path_buf()), message))
    }

    /// Returns the string value of a scalar leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a direct child of a mapping by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Resolves a dotted token path such as `dark.background.primary`.
    ///
    /// An empty path resolves to the node itself.
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |node, segment| node.get(segment))
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => Node::Scalar(s),
            Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Null | Value::Bool(_) | Value::Number(_) => Node::Other,
        }
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::String(s) => Node::Scalar(s),
            Value::Mapping(map) => Node::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Node::from(v)))
                    .collect(),
            ),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Tagged(tagged) => Node::from(tagged.value),
            Value::Null | Value::Bool(_) | Value::Number(_) => Node::Other,
        }
    }
}

/// YAML allows non-string keys; token paths are strings, so render them.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        other => format!("{:?}", other),
    }
}
