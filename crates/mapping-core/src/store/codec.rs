//! String encoding of stored values
//!
//! Lists and objects are JSON-encoded. Scalars keep their natural text
//! form, with null stored as the empty string. On the way back, anything
//! that parses as JSON is decoded and everything else stays a string.

use serde_json::Value;

use crate::Result;
use crate::flatten::FlatValue;

/// Encode a flattened value for storage.
pub fn encode(value: &FlatValue) -> Result<String> {
    match value {
        FlatValue::List(items) => Ok(serde_json::to_string(items)?),
        FlatValue::Scalar(scalar) => encode_json(scalar),
    }
}

/// Encode an arbitrary JSON value for storage.
pub fn encode_json(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value)?,
    })
}

/// Decode a stored string, returning `None` for absent, empty or `null`
/// values.
pub fn decode(raw: Option<&str>) -> Option<Value> {
    match raw {
        None | Some("") => None,
        Some(raw) => match serde_json::from_str(raw) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(_) => Some(Value::String(raw.to_string())),
        },
    }
}
