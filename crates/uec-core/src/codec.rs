//! Wire-format helpers: parse + validate, normalization, and canonical
//! serialization. The wire emits top-level keys in a fixed reading order;
//! comparison code sorts keys alphabetically. The two orderings serve
//! different purposes and are applied independently.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use uec_protocol::ParseOutcome;

use crate::error::CardError;
use crate::validate::validate_uec;
use crate::value::{is_object, sort_keys};

/// Fixed top-level emission order for serialized cards.
const TOP_LEVEL_ORDER: [&str; 6] = [
    "schema",
    "kind",
    "payload",
    "app_specific_settings",
    "meta",
    "extensions",
];

const ENVELOPE_MAPS: [&str; 3] = ["app_specific_settings", "meta", "extensions"];

/// Parse UTF-8 JSON text and validate the result. Malformed JSON yields a
/// single root error; a parsed-but-invalid document yields the full
/// validation list. `value` is present only on success.
pub fn parse_uec(text: &str, strict: bool) -> ParseOutcome {
    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(error) => {
            return ParseOutcome {
                ok: false,
                value: None,
                errors: vec![format!("root: invalid JSON ({})", error)],
            };
        }
    };

    let report = validate_uec(&parsed, strict);
    if report.ok {
        ParseOutcome {
            ok: true,
            value: Some(parsed),
            errors: Vec::new(),
        }
    } else {
        ParseOutcome {
            ok: false,
            value: None,
            errors: report.errors,
        }
    }
}

/// Deep-cloned canonical form: object keys recursively sorted, array order
/// preserved, and the three envelope maps present as `{}` whenever they are
/// not already objects.
pub fn normalize_uec(card: &Value) -> Result<Value, CardError> {
    let mut filled = card.clone();
    if let Some(root) = filled.as_object_mut() {
        for key in ENVELOPE_MAPS {
            if !root.get(key).is_some_and(is_object) {
                root.insert(key.to_string(), Value::Object(Map::new()));
            }
        }
    }
    sort_keys(&filled)
}

/// Normalize and serialize with `space`-wide indentation (`0` = compact),
/// emitting top-level keys in the fixed wire order.
pub fn stringify_uec(card: &Value, space: usize) -> Result<String, CardError> {
    let mut normalized = normalize_uec(card)?;

    if let Some(root) = normalized.as_object_mut() {
        let mut ordered = Map::with_capacity(root.len());
        for key in TOP_LEVEL_ORDER {
            if let Some(value) = root.remove(key) {
                ordered.insert(key.to_string(), value);
            }
        }
        // Unknown top-level keys follow the canonical six, already sorted.
        for (key, value) in std::mem::take(root) {
            ordered.insert(key, value);
        }
        *root = ordered;
    }

    if space == 0 {
        return serde_json::to_string(&normalized).map_err(CardError::from);
    }

    let indent = " ".repeat(space);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    normalized.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
