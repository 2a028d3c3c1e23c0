//! One-way v1 → v2 conversion. Pure and total over valid v1 input: the
//! original card is never touched, the output is built on a deep clone.

use serde_json::{Map, Value};
use uec_protocol::{SCHEMA_V1, SCHEMA_V2};

use crate::error::CardError;
use crate::validate::validate_uec;
use crate::value::{is_number, is_string};

/// Marker prefix a v1 `systemPrompt` uses to reference a prompt template
/// instead of carrying literal prompt text.
pub(crate) const TEMPLATE_PREFIX: &str = "_ID:";

/// Convert a valid v1 card into its v2 form.
///
/// Fails when the input does not validate as a lenient v1 card, or when it
/// declares any version other than v1: a valid v2 card must not silently
/// "convert" into a no-op.
pub fn convert_uec_v1_to_v2(card: &Value) -> Result<Value, CardError> {
    let report = validate_uec(card, false);
    if !report.ok {
        return Err(CardError::NotConvertible {
            errors: report.errors,
        });
    }

    let declared = card
        .pointer("/schema/version")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if declared != SCHEMA_V1 {
        return Err(CardError::WrongVersion {
            expected: SCHEMA_V1,
            found: declared.to_string(),
        });
    }

    let mut next = card.clone();

    if let Some(schema) = next.get_mut("schema").and_then(Value::as_object_mut) {
        schema.insert("version".to_string(), Value::String(SCHEMA_V2.to_string()));
    }

    if let Some(payload) = next.get_mut("payload").and_then(Value::as_object_mut) {
        payload.remove("rules");
        promote_scene(payload);
        promote_prompt_template(payload);
    }

    if let Some(root) = next.as_object_mut() {
        stamp_provenance(root);
    }

    Ok(next)
}

/// Collapse the v1 scene list to the single v2 scene: the default scene when
/// one is named and found, else the first entry. An empty list produces no
/// `scene` key at all.
fn promote_scene(payload: &mut Map<String, Value>) {
    let scenes = payload.remove("scenes");
    let default_id = payload.remove("defaultSceneId");

    let Some(Value::Array(scenes)) = scenes else {
        return;
    };
    if scenes.is_empty() {
        return;
    }

    let default_id = default_id.as_ref().and_then(Value::as_str);
    let picked = default_id
        .and_then(|id| {
            scenes
                .iter()
                .find(|scene| scene.get("id").and_then(Value::as_str) == Some(id))
        })
        .or_else(|| scenes.first());

    if let Some(Value::Object(picked)) = picked {
        let mut scene = picked.clone();
        let selected = scene.remove("selectedVariantId");
        let selected = match selected {
            Some(Value::String(id)) => Value::String(id),
            _ => Value::from(0),
        };
        scene.insert("selectedVariant".to_string(), selected);
        payload.insert("scene".to_string(), Value::Object(scene));
    }
}

/// `"_ID:<id>"` system prompts become a `promptTemplateId` with the prompt
/// text cleared; anything else passes through untouched.
fn promote_prompt_template(payload: &mut Map<String, Value>) {
    let template_id = payload
        .get("systemPrompt")
        .and_then(Value::as_str)
        .and_then(|prompt| prompt.strip_prefix(TEMPLATE_PREFIX))
        .map(str::to_owned);

    if let Some(template_id) = template_id {
        tracing::debug!(template_id = %template_id, "promoting system prompt template reference");
        payload.insert(
            "promptTemplateId".to_string(),
            Value::String(template_id),
        );
        payload.insert("systemPrompt".to_string(), Value::Null);
    }
}

/// Seed `original*` provenance from the v1 meta timestamps and source, but
/// never clobber values that are already there; repeated conversions and
/// re-annotated documents keep their earliest provenance.
fn stamp_provenance(root: &mut Map<String, Value>) {
    let mut meta = match root.get("meta") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    if !meta.contains_key("originalCreatedAt") {
        if let Some(created) = meta.get("createdAt").filter(|v| is_number(v)).cloned() {
            meta.insert("originalCreatedAt".to_string(), created);
        }
    }

    if !meta.contains_key("originalUpdatedAt") {
        if let Some(updated) = meta.get("updatedAt").filter(|v| is_number(v)).cloned() {
            meta.insert("originalUpdatedAt".to_string(), updated);
        }
    }

    if !meta.contains_key("originalSource") {
        if let Some(source) = meta.get("source").filter(|v| is_string(v)).cloned() {
            meta.insert("originalSource".to_string(), source);
        }
    }

    root.insert("meta".to_string(), Value::Object(meta));
}
