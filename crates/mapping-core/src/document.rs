//! Parsed mapping source documents

use mapping_fs::{NormalizedPath, io};
use serde_yaml::Value as YamlValue;

use crate::flatten::{FlatMap, flatten_mappings, key_text};
use crate::{Error, Result};

/// A mapping source file, `{ mappings: { ... } }` plus optional metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDocument {
    source: NormalizedPath,
    root: serde_yaml::Mapping,
}

impl MappingDocument {
    /// Read and parse a source file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(&content, path.clone())
    }

    /// Parse source content. `source` is only used for diagnostics.
    pub fn parse(content: &str, source: NormalizedPath) -> Result<Self> {
        let value: YamlValue = serde_yaml::from_str(content).map_err(|e| Error::Parse {
            path: source.to_native(),
            message: e.to_string(),
        })?;

        let root = match value {
            YamlValue::Mapping(root) => root,
            YamlValue::Null => serde_yaml::Mapping::new(),
            other => {
                return Err(Error::InvalidDocument {
                    path: source.to_native(),
                    message: format!("expected a mapping at the top level, found {}", kind(&other)),
                });
            }
        };

        Ok(Self { source, root })
    }

    /// File this document was read from.
    pub fn source(&self) -> &NormalizedPath {
        &self.source
    }

    /// Optional `name` field.
    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(YamlValue::as_str)
    }

    /// Optional `description` field.
    pub fn description(&self) -> Option<&str> {
        self.root.get("description").and_then(YamlValue::as_str)
    }

    /// Any other top-level field.
    pub fn field(&self, name: &str) -> Option<&YamlValue> {
        self.root.get(name)
    }

    /// Flatten the `mappings` block.
    ///
    /// A missing or empty block yields no entries. A sequence is keyed by
    /// position; any scalar is rejected.
    pub fn flatten(&self) -> Result<FlatMap> {
        match self.root.get("mappings") {
            None | Some(YamlValue::Null) => {
                tracing::warn!(source = %self.source, "Mapping document has no `mappings` block");
                Ok(FlatMap::new())
            }
            Some(YamlValue::Mapping(mappings)) => Ok(flatten_mappings(mappings)),
            Some(YamlValue::Sequence(items)) => {
                let keyed: serde_yaml::Mapping = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (YamlValue::from(i.to_string()), item.clone()))
                    .collect();
                Ok(flatten_mappings(&keyed))
            }
            Some(other) => Err(Error::InvalidDocument {
                path: self.source.to_native(),
                message: format!("`mappings` must be a mapping, found {}", kind(other)),
            }),
        }
    }

    /// Top-level keys of the `mappings` block, in source order.
    pub fn mapping_keys(&self) -> Vec<String> {
        match self.root.get("mappings") {
            Some(YamlValue::Mapping(mappings)) => mappings.keys().map(key_text).collect(),
            _ => Vec::new(),
        }
    }
}

fn kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}
