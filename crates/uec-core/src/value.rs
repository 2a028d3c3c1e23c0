use serde_json::{Map, Value};

use crate::error::CardError;

/// Hard ceiling on recursive traversal of untrusted documents. Deeper nesting
/// fails with [`CardError::DepthExceeded`] instead of overflowing the stack.
pub const MAX_DEPTH: usize = 128;

pub(crate) fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

// serde_json numbers are finite by construction; NaN/Infinity cannot parse.
pub(crate) fn is_number(value: &Value) -> bool {
    matches!(value, Value::Number(_))
}

pub(crate) fn is_bool(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

pub(crate) fn is_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Absent, `null`, or a string.
pub(crate) fn optional_string(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null) | Some(Value::String(_)))
}

pub(crate) fn optional_number(value: Option<&Value>) -> bool {
    value.is_none() || value.is_some_and(is_number)
}

pub(crate) fn optional_bool(value: Option<&Value>) -> bool {
    value.is_none() || value.is_some_and(is_bool)
}

pub(crate) fn optional_object(value: Option<&Value>) -> bool {
    value.is_none() || value.is_some_and(is_object)
}

pub(crate) fn optional_string_array(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Array(items)) => items.iter().all(is_string),
        _ => false,
    }
}

/// Dotted-path join; the root path is the empty string.
pub(crate) fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", base, key)
    }
}

pub(crate) fn index_path(base: &str, index: usize) -> String {
    format!("{}[{}]", base, index)
}

/// Label for a divergence at the document root.
pub(crate) fn root_path(path: &str) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.to_string()
    }
}

/// Deep clone with every object's keys re-inserted in alphabetical order, so
/// comparisons never depend on how the input happened to be keyed. Array
/// element order is preserved.
pub(crate) fn sort_keys(value: &Value) -> Result<Value, CardError> {
    fn walk(value: &Value, depth: usize) -> Result<Value, CardError> {
        if depth > MAX_DEPTH {
            return Err(CardError::DepthExceeded);
        }
        match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(walk(item, depth + 1)?);
                }
                Ok(Value::Array(out))
            }
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                let mut out = Map::with_capacity(map.len());
                for key in keys {
                    out.insert(key.clone(), walk(&map[key.as_str()], depth + 1)?);
                }
                Ok(Value::Object(out))
            }
            _ => Ok(value.clone()),
        }
    }
    walk(value, 0)
}
