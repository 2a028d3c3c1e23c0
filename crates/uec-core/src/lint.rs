//! Lint-style quality heuristics. Every check is independent and non-fatal;
//! linting never throws and never blocks another operation.

use serde_json::Value;
use uec_protocol::{AssetRefKind, LintReport, SCHEMA_V2};

use crate::assets::extract_assets;

/// Inline base64 payloads above this many characters draw a size warning.
const INLINE_ASSET_WARN_CHARS: usize = 200_000;

pub fn lint_uec(card: &Value) -> LintReport {
    let mut warnings = Vec::new();

    let Some(payload) = card.get("payload").and_then(Value::as_object) else {
        return LintReport {
            ok: false,
            warnings: vec!["root: not a valid UEC object shape".to_string()],
        };
    };

    if payload
        .get("description")
        .and_then(Value::as_str)
        .is_some_and(|description| description.trim().is_empty())
    {
        warnings.push("payload.description is an empty string".to_string());
    }

    if timestamps_reversed(payload.get("createdAt"), payload.get("updatedAt")) {
        warnings.push("payload.createdAt is greater than payload.updatedAt".to_string());
    }

    if let Some(meta) = card.get("meta").and_then(Value::as_object) {
        if timestamps_reversed(meta.get("createdAt"), meta.get("updatedAt")) {
            warnings.push("meta.createdAt is greater than meta.updatedAt".to_string());
        }
    }

    let is_v2 = card.pointer("/schema/version").and_then(Value::as_str) == Some(SCHEMA_V2);
    if is_v2 {
        if let Some(scene) = payload.get("scene").and_then(Value::as_object) {
            if let Some(selected) = scene.get("selectedVariant").and_then(Value::as_str) {
                let matched = scene
                    .get("variants")
                    .and_then(Value::as_array)
                    .is_some_and(|variants| {
                        variants
                            .iter()
                            .any(|variant| variant.get("id").and_then(Value::as_str) == Some(selected))
                    });
                if !matched {
                    warnings.push(
                        "payload.scene.selectedVariant does not match any variant id".to_string(),
                    );
                }
            }
        }
    }

    match extract_assets(card) {
        Ok(assets) => {
            for asset in assets {
                let oversized = asset.kind == AssetRefKind::Locator
                    && asset.value.get("type").and_then(Value::as_str) == Some("inline_base64")
                    && asset
                        .value
                        .get("data")
                        .and_then(Value::as_str)
                        .is_some_and(|data| data.len() > INLINE_ASSET_WARN_CHARS);
                if oversized {
                    warnings.push(format!("{}: inline_base64 asset is very large", asset.path));
                }
            }
        }
        Err(_) => {
            warnings.push("root: document nesting is too deep to scan for assets".to_string());
        }
    }

    LintReport {
        ok: warnings.is_empty(),
        warnings,
    }
}

fn timestamps_reversed(created: Option<&Value>, updated: Option<&Value>) -> bool {
    created
        .and_then(Value::as_f64)
        .zip(updated.and_then(Value::as_f64))
        .is_some_and(|(created, updated)| created > updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_cards_lint_clean() {
        let card = json!({
            "schema": { "name": "UEC", "version": "1.0" },
            "kind": "character",
            "payload": {
                "id": "c",
                "name": "N",
                "description": "fine",
                "createdAt": 1,
                "updatedAt": 2
            }
        });
        let report = lint_uec(&card);
        assert!(report.ok, "unexpected warnings: {:?}", report.warnings);
    }

    #[test]
    fn missing_payload_is_the_single_fatal_shape() {
        let report = lint_uec(&json!({"payload": "nope"}));
        assert!(!report.ok);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("root:"));
    }

    #[test]
    fn accumulates_independent_warnings() {
        let card = json!({
            "schema": { "name": "UEC", "version": "2.0" },
            "kind": "character",
            "payload": {
                "id": "c",
                "name": "N",
                "description": "   ",
                "createdAt": 20,
                "updatedAt": 10,
                "scene": {
                    "id": "s",
                    "content": "text",
                    "selectedVariant": "missing",
                    "variants": [
                        { "id": "v1", "content": "alt", "createdAt": 1 }
                    ]
                }
            },
            "meta": { "createdAt": 5, "updatedAt": 1 }
        });

        let report = lint_uec(&card);
        assert!(!report.ok);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("empty string")));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("payload.createdAt is greater")));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("meta.createdAt is greater")));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("does not match any variant id")));
    }

    #[test]
    fn string_selection_without_variants_warns() {
        let card = json!({
            "schema": { "name": "UEC", "version": "2.0" },
            "kind": "character",
            "payload": {
                "id": "c",
                "name": "N",
                "scene": { "id": "s", "content": "text", "selectedVariant": "v9" }
            }
        });
        let report = lint_uec(&card);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("does not match any variant id")));
    }

    #[test]
    fn oversized_inline_assets_are_named_by_path() {
        let card = json!({
            "schema": { "name": "UEC", "version": "2.0" },
            "kind": "character",
            "payload": {
                "id": "c",
                "name": "N",
                "avatar": {
                    "type": "inline_base64",
                    "data": "A".repeat(INLINE_ASSET_WARN_CHARS + 1)
                }
            }
        });

        let report = lint_uec(&card);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.starts_with("payload.avatar:") && w.contains("very large")));
    }
}
