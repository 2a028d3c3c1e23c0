//! Envelope validation and the operations derived from it. Validation is a
//! read-only pass that accumulates every defect it can see; it never throws
//! and never short-circuits past the first problem.

use serde_json::Value;
use uec_protocol::{Card, CardKind, SchemaVersion, ValidationReport, SCHEMA_NAME};

use crate::error::CardError;
use crate::payload::PayloadShape;
use crate::shapes::Fields;
use crate::value::{is_object, is_string};

/// Validate the `schema` header. Returns the raw declared version string when
/// one could be read, even if it names an unsupported version, so the caller
/// can distinguish "cannot tell the version" from "told an unknown one".
fn check_schema_header(schema: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    let Some(Value::Object(map)) = schema else {
        errors.push("schema: must be an object".to_string());
        return None;
    };

    match map.get("name") {
        Some(Value::String(name)) if name == SCHEMA_NAME => {}
        Some(Value::String(_)) => errors.push("schema.name: must be \"UEC\"".to_string()),
        _ => errors.push("schema.name: must be a string".to_string()),
    }

    let declared = match map.get("version") {
        Some(Value::String(version)) => {
            if SchemaVersion::parse(version).is_none() {
                errors.push(format!("schema.version: unknown version \"{}\"", version));
            }
            Some(version.clone())
        }
        _ => {
            errors.push("schema.version: must be a string".to_string());
            None
        }
    };

    if let Some(compat) = map.get("compat") {
        if !is_string(compat) {
            errors.push("schema.compat: must be a string if provided".to_string());
        }
    }

    declared
}

fn check_meta(meta: Option<&Value>, errors: &mut Vec<String>) {
    let Some(meta) = meta else {
        return;
    };

    let Value::Object(map) = meta else {
        errors.push("meta: must be an object".to_string());
        return;
    };

    let mut fields = Fields::new(map, "meta", errors, false);
    fields.optional_number("createdAt");
    fields.optional_number("updatedAt");
    fields.optional_string("source");
    fields.optional_string_array("authors");
    fields.optional_string("license");
}

/// v2 meta layers the `original*` provenance fields on the v1 contract; all
/// three are mandatory under strict mode.
fn check_meta_v2(meta: Option<&Value>, errors: &mut Vec<String>, strict: bool) {
    check_meta(meta, errors);

    let map = match meta {
        Some(Value::Object(map)) => map,
        _ => {
            if strict {
                errors.push("meta.originalCreatedAt: is required in strict mode".to_string());
                errors.push("meta.originalUpdatedAt: is required in strict mode".to_string());
                errors.push("meta.originalSource: is required in strict mode".to_string());
            }
            return;
        }
    };

    let mut fields = Fields::new(map, "meta", errors, strict);
    fields.optional_number("originalCreatedAt");
    fields.optional_number("originalUpdatedAt");
    fields.optional_string("originalSource");

    fields.strict_number("originalCreatedAt");
    fields.strict_number("originalUpdatedAt");
    fields.strict_string("originalSource");
}

/// Validate an arbitrary value against the card contract. Error order is
/// stable: envelope, kind, payload, settings, meta, extensions.
pub fn validate_uec(value: &Value, strict: bool) -> ValidationReport {
    let mut errors = Vec::new();

    let Value::Object(map) = value else {
        return ValidationReport {
            ok: false,
            errors: vec!["root: must be an object".to_string()],
        };
    };

    let declared = check_schema_header(map.get("schema"), &mut errors);
    let version = declared.as_deref().and_then(SchemaVersion::parse);

    let kind = match map.get("kind").and_then(Value::as_str) {
        Some("character") => Some(CardKind::Character),
        Some("persona") => Some(CardKind::Persona),
        _ => {
            errors.push("kind: must be \"character\" or \"persona\"".to_string());
            None
        }
    };

    match map.get("payload") {
        Some(Value::Object(payload)) => {
            // Unknown versions skip payload checks entirely: the only signal
            // for them is the schema.version error above.
            if let (Some(kind), Some(version)) = (kind, version) {
                PayloadShape::resolve(kind, version).check(payload, &mut errors, strict);
            }
        }
        _ => errors.push("payload: must be an object".to_string()),
    }

    if let Some(settings) = map.get("app_specific_settings") {
        if !is_object(settings) {
            errors.push("app_specific_settings: must be an object".to_string());
        }
    }

    if version == Some(SchemaVersion::V2) {
        check_meta_v2(map.get("meta"), &mut errors, strict);
    } else {
        check_meta(map.get("meta"), &mut errors);
    }

    if let Some(extensions) = map.get("extensions") {
        if !is_object(extensions) {
            errors.push("extensions: must be an object".to_string());
        }
    }

    ValidationReport {
        ok: errors.is_empty(),
        errors,
    }
}

/// Validation with every strict-mode requirement enabled.
pub fn validate_uec_strict(value: &Value) -> ValidationReport {
    validate_uec(value, true)
}

/// Normal validation plus a pin on the declared schema version.
pub fn validate_uec_at_version(value: &Value, version: &str, strict: bool) -> ValidationReport {
    let mut report = validate_uec(value, strict);

    if let Some(current) = value
        .pointer("/schema/version")
        .and_then(Value::as_str)
    {
        if current != version {
            report.ok = false;
            report.errors.push(format!(
                "schema.version: expected \"{}\" but received \"{}\"",
                version, current
            ));
        }
    }

    report
}

pub fn is_uec(value: &Value, strict: bool) -> bool {
    validate_uec(value, strict).ok
}

pub fn is_character_uec(value: &Value, strict: bool) -> bool {
    is_uec(value, strict)
        && value.get("kind").and_then(Value::as_str) == Some(CardKind::Character.as_str())
}

pub fn is_persona_uec(value: &Value, strict: bool) -> bool {
    is_uec(value, strict)
        && value.get("kind").and_then(Value::as_str) == Some(CardKind::Persona.as_str())
}

/// Validate and hand back a typed envelope, or fail with the full error list.
pub fn assert_uec(value: &Value, strict: bool) -> Result<Card, CardError> {
    let report = validate_uec(value, strict);
    if !report.ok {
        return Err(CardError::Invalid {
            errors: report.errors,
        });
    }
    serde_json::from_value(value.clone()).map_err(CardError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_v1_character() -> Value {
        json!({
            "schema": { "name": "UEC", "version": "1.0" },
            "kind": "character",
            "payload": { "id": "char-1", "name": "Aster Vale" }
        })
    }

    #[test]
    fn accepts_minimal_cards_of_both_versions_and_kinds() {
        let v2_persona = json!({
            "schema": { "name": "UEC", "version": "2.0" },
            "kind": "persona",
            "payload": { "id": "per-1", "title": "Pragmatic Analyst" }
        });

        assert!(validate_uec(&minimal_v1_character(), false).ok);
        assert!(validate_uec(&v2_persona, false).ok);
    }

    #[test]
    fn rejects_non_object_roots_with_a_single_error() {
        let report = validate_uec(&json!("nope"), false);
        assert_eq!(report.errors, vec!["root: must be an object"]);
    }

    #[test]
    fn unknown_version_suppresses_payload_errors() {
        let card = json!({
            "schema": { "name": "UEC", "version": "3.0" },
            "kind": "character",
            "payload": { "description": 42 }
        });

        let report = validate_uec(&card, false);
        assert!(!report.ok);
        assert!(report
            .errors
            .iter()
            .any(|err| err.contains("unknown version")));
        assert!(
            !report.errors.iter().any(|err| err.starts_with("payload.")),
            "payload checks must be skipped for unknown versions: {:?}",
            report.errors
        );
    }

    #[test]
    fn kind_and_payload_errors_accumulate_together() {
        let card = json!({
            "schema": { "name": "UEC", "version": "1.0" },
            "kind": "robot",
            "payload": []
        });

        let report = validate_uec(&card, false);
        assert!(report.errors.iter().any(|err| err.starts_with("kind:")));
        assert!(report.errors.iter().any(|err| err.starts_with("payload:")));
    }

    #[test]
    fn strict_v2_requires_provenance_meta() {
        let card = json!({
            "schema": { "name": "UEC", "version": "2.0" },
            "kind": "character",
            "payload": {
                "id": "s1",
                "name": "A",
                "description": "desc",
                "scene": { "id": "sc1", "content": "opening" },
                "createdAt": 1,
                "updatedAt": 2
            }
        });

        assert!(validate_uec(&card, false).ok);

        let strict = validate_uec(&card, true);
        assert!(!strict.ok);
        for field in ["originalCreatedAt", "originalUpdatedAt", "originalSource"] {
            assert!(
                strict
                    .errors
                    .iter()
                    .any(|err| err.contains(&format!("meta.{}", field))),
                "missing strict error for meta.{}: {:?}",
                field,
                strict.errors
            );
        }
    }

    #[test]
    fn strict_v2_rejects_retired_rules_field() {
        let mut card = json!({
            "schema": { "name": "UEC", "version": "2.0" },
            "kind": "character",
            "payload": { "id": "c", "name": "N", "rules": ["r"] }
        });

        assert!(validate_uec(&card, false).ok, "lenient mode tolerates rules");

        card["payload"]["description"] = json!("d");
        let report = validate_uec(&card, true);
        assert!(report.errors.iter().any(|err| {
            err.contains("payload.rules") && err.contains("not a valid field in v2")
        }));
    }

    #[test]
    fn at_version_appends_expectation_error() {
        let report = validate_uec_at_version(&minimal_v1_character(), "2.0", false);
        assert!(!report.ok);
        assert!(report
            .errors
            .iter()
            .any(|err| err.contains("expected \"2.0\" but received \"1.0\"")));
    }

    #[test]
    fn kind_predicates_check_both_validity_and_kind() {
        let card = minimal_v1_character();
        assert!(is_character_uec(&card, false));
        assert!(!is_persona_uec(&card, false));
    }

    #[test]
    fn assert_uec_returns_typed_envelope() {
        let card = assert_uec(&minimal_v1_character(), false).expect("valid card");
        assert_eq!(card.kind, CardKind::Character);
        assert_eq!(card.schema.version, "1.0");

        let err = assert_uec(&json!({"schema": 1}), false).unwrap_err();
        assert!(err.to_string().contains("invalid UEC"));
    }
}
