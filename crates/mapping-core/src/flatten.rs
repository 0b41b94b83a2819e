//! Flattening of nested mapping documents into dotted keys
//!
//! Rules, applied recursively from each top-level key:
//!
//! - a scalar is emitted under the current key;
//! - a keyed mapping recurses into `{key}.{child}`;
//! - a sequence of scalars is emitted as a single list value;
//! - a sequence holding containers re-flattens each container under the
//!   *same* key and merges the result over what came before.
//!
//! The last rule means `x: [1, {y: 2}]` yields both `x = [1]` and
//! `x.y = 2`, and `x: [{a: 1}, {a: 2}]` keeps only `x.a = 2`. Existing
//! compiled stores depend on this, so it is kept as is.
//!
//! A mapping whose keys are exactly `0..n` in order is treated as a
//! sequence. Empty sequences and mappings emit nothing.

use std::collections::HashMap;

use serde_json::Value;
use serde_yaml::Value as YamlValue;

/// A flattened leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl FlatValue {
    /// JSON view of this value.
    pub fn to_json(&self) -> Value {
        match self {
            FlatValue::Scalar(value) => value.clone(),
            FlatValue::List(items) => Value::Array(items.clone()),
        }
    }
}

/// Insertion-ordered dotted-key map where later inserts overwrite in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatMap {
    entries: Vec<(String, FlatValue)>,
    index: HashMap<String, usize>,
}

impl FlatMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlatValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FlatValue) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Append one scalar to the list stored under `key`.
    fn push(&mut self, key: &str, item: Value) {
        match self.index.get(key) {
            Some(&i) => match &mut self.entries[i].1 {
                FlatValue::List(items) => items.push(item),
                slot @ FlatValue::Scalar(_) => {
                    let previous = slot.to_json();
                    *slot = FlatValue::List(vec![previous, item]);
                }
            },
            None => self.insert(key, FlatValue::List(vec![item])),
        }
    }

    /// Merge `other` over `self`: overlapping keys take `other`'s value.
    pub fn merge(&mut self, other: FlatMap) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for FlatMap {
    type Item = (String, FlatValue);
    type IntoIter = std::vec::IntoIter<(String, FlatValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Flatten the entries of a `mappings` block.
///
/// Top-level keys are never treated as list indices, even when they look
/// like `0..n`.
pub fn flatten_mappings(mappings: &serde_yaml::Mapping) -> FlatMap {
    let mut collected = FlatMap::new();
    for (key, value) in mappings {
        collected.merge(flatten_value(&key_text(key), value));
    }
    collected
}

/// Flatten one value rooted at `key`.
pub fn flatten_value(key: &str, value: &YamlValue) -> FlatMap {
    let mut processed = FlatMap::new();

    match value {
        YamlValue::Tagged(tagged) => return flatten_value(key, &tagged.value),
        YamlValue::Sequence(items) => flatten_list(key, items.iter(), &mut processed),
        YamlValue::Mapping(map) if is_list_like(map) => {
            flatten_list(key, map.values(), &mut processed)
        }
        YamlValue::Mapping(map) => {
            for (child_key, child) in map {
                let child_path = format!("{key}.{}", key_text(child_key));
                processed.merge(flatten_value(&child_path, child));
            }
        }
        scalar => processed.insert(key, FlatValue::Scalar(scalar_to_json(scalar))),
    }

    processed
}

fn flatten_list<'a>(
    key: &str,
    items: impl Iterator<Item = &'a YamlValue>,
    processed: &mut FlatMap,
) {
    for item in items {
        let item = untag(item);
        if is_container(item) {
            processed.merge(flatten_value(key, item));
        } else {
            processed.push(key, scalar_to_json(item));
        }
    }
}

fn untag(value: &YamlValue) -> &YamlValue {
    match value {
        YamlValue::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn is_container(value: &YamlValue) -> bool {
    matches!(value, YamlValue::Sequence(_) | YamlValue::Mapping(_))
}

/// A mapping keyed exactly `0, 1, .., n-1` in order (or empty).
fn is_list_like(map: &serde_yaml::Mapping) -> bool {
    map.keys()
        .enumerate()
        .all(|(i, key)| key_text(key) == i.to_string())
}

/// Textual form of a mapping key.
pub(crate) fn key_text(key: &YamlValue) -> String {
    match untag(key) {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(true) => "1".to_string(),
        YamlValue::Bool(false) => "0".to_string(),
        YamlValue::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Convert a YAML scalar to its JSON equivalent.
///
/// Non-finite floats have no JSON form and are kept as text.
fn scalar_to_json(value: &YamlValue) -> Value {
    match untag(value) {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string()))
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        other => serde_json::to_value(other).unwrap_or(Value::Null),
    }
}
