//! Convenience lookups on top of [`TenantMappings`]

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::mapping::TenantMappings;
use crate::store::{MappingStore, codec};
use crate::types::MappingType;
use crate::{Error, Result};

static NUMERIC_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").ok());

/// Target type for [`TenantMappings::settings_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsCast {
    Int,
    Float,
    Bool,
    String,
    Array,
}

impl SettingsCast {
    pub fn name(&self) -> &'static str {
        match self {
            SettingsCast::Int => "int",
            SettingsCast::Float => "float",
            SettingsCast::Bool => "bool",
            SettingsCast::String => "string",
            SettingsCast::Array => "array",
        }
    }

    /// Convert `value` with loose scalar semantics.
    ///
    /// Arrays and objects cast to anything but `Array` are JSON-encoded first.
    pub fn apply(&self, value: Value) -> Result<Value> {
        let value = match (self, value) {
            (SettingsCast::Array, value) => value,
            (_, value @ (Value::Array(_) | Value::Object(_))) => Value::String(codec::encode_json(&value)?),
            (_, value) => value,
        };

        Ok(match self {
            SettingsCast::Int => Value::from(to_int(&value)),
            SettingsCast::Float => Value::from(to_float(&value)),
            SettingsCast::Bool => Value::Bool(to_bool(&value)),
            SettingsCast::String => Value::String(to_text(&value)),
            SettingsCast::Array => to_array(value),
        })
    }
}

impl fmt::Display for SettingsCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingsCast {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(SettingsCast::Int),
            "float" | "double" => Ok(SettingsCast::Float),
            "bool" | "boolean" => Ok(SettingsCast::Bool),
            "string" => Ok(SettingsCast::String),
            "array" => Ok(SettingsCast::Array),
            _ => Err(Error::InvalidCast { value: s.to_string() }),
        }
    }
}

/// Whether a resolved value counts as present.
///
/// `null`, blank strings and empty arrays or objects do not.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

impl<S: MappingStore> TenantMappings<'_, S> {
    /// Resolve `key`, treating unfilled values as absent.
    pub fn mapping(&self, mapping_type: MappingType, key: &str) -> Result<Option<Value>> {
        Ok(self.get(mapping_type, key)?.filter(is_filled))
    }

    /// Resolve a descriptor as text, falling back to `default`.
    pub fn descriptor(&self, key: &str, default: Option<&str>) -> Result<Option<String>> {
        let resolved = self.mapping(MappingType::Descriptor, key)?;
        Ok(match resolved {
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
            None => default.map(str::to_string),
        })
    }

    /// Resolve a setting, falling back to `default`, then apply `cast`.
    ///
    /// The cast is skipped when neither the setting nor the default is
    /// present.
    pub fn settings_map(
        &self,
        key: &str,
        default: Option<Value>,
        cast: Option<SettingsCast>,
    ) -> Result<Option<Value>> {
        let resolved = self.mapping(MappingType::Settings, key)?.or(default);

        match (resolved, cast) {
            (Some(value), Some(cast)) => cast.apply(value).map(Some),
            (resolved, _) => Ok(resolved),
        }
    }
}

fn numeric_prefix(text: &str) -> f64 {
    let trimmed = text.trim_start();
    NUMERIC_PREFIX
        .as_ref()
        .and_then(|re| re.find(trimmed))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => numeric_prefix(s),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(map) => f64::from(u8::from(!map.is_empty())),
    }
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => float_to_int(n.as_f64().unwrap_or(0.0)),
        },
        other => float_to_int(to_float(other)),
    }
}

fn float_to_int(f: f64) -> i64 {
    if f.is_finite() { f.trunc() as i64 } else { 0 }
}

fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_array(value: Value) -> Value {
    match value {
        Value::Null => Value::Array(Vec::new()),
        value @ (Value::Array(_) | Value::Object(_)) => value,
        scalar => Value::Array(vec![scalar]),
    }
}
