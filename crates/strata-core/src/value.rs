//! Helpers over the untyped configuration value model.

use serde_json::{Map, Value};

/// A parsed configuration document: string keys to untyped values.
pub type ConfigMapping = Map<String, Value>;

/// Name of a value's runtime type, as shown in validation messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Follow `path` through nested mappings.
///
/// Returns `None` as soon as a segment is missing or an intermediate value
/// is not a mapping.
pub fn lookup<'a, S: AsRef<str>>(mapping: &'a ConfigMapping, path: &[S]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = mapping.get(first.as_ref())?;
    for segment in rest {
        current = current.as_object()?.get(segment.as_ref())?;
    }
    Some(current)
}
