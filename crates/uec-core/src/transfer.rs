//! Version transfer facade: upgrades delegate to the converter, downgrades
//! run the mirror transform and report every piece of dropped information as
//! a warning.

use serde_json::{Map, Value};
use uec_protocol::{DowngradeOutcome, SchemaVersion, SCHEMA_V1, SCHEMA_V2};

use crate::codec::normalize_uec;
use crate::convert::{convert_uec_v1_to_v2, TEMPLATE_PREFIX};
use crate::error::CardError;

/// v2-only payload fields with no v1 counterpart; each dropped occurrence
/// yields one warning naming the field.
const DROPPED_V2_FIELDS: [&str; 7] = [
    "fallbackModelId",
    "nickname",
    "creator",
    "creatorNotes",
    "creatorNotesMultilingual",
    "source",
    "characterBook",
];

const DROPPED_META_FIELDS: [&str; 3] = [
    "originalCreatedAt",
    "originalUpdatedAt",
    "originalSource",
];

fn declared_version(card: &Value) -> Result<&str, CardError> {
    card.pointer("/schema/version")
        .and_then(Value::as_str)
        .ok_or(CardError::MissingSchema)
}

/// Bring a card up to `target`. Only same-version (normalized copy) and
/// v1 → v2 are supported.
pub fn upgrade_uec(card: &Value, target: &str) -> Result<Value, CardError> {
    if SchemaVersion::parse(target).is_none() {
        return Err(CardError::UnsupportedTarget(target.to_string()));
    }

    let source = declared_version(card)?;
    if source == target {
        return normalize_uec(card);
    }
    if source == SCHEMA_V1 && target == SCHEMA_V2 {
        return convert_uec_v1_to_v2(card);
    }
    Err(CardError::UnsupportedSource(source.to_string()))
}

/// Bring a v2 card back down to v1, reporting information loss as warnings.
/// A card already at v1 comes back normalized with no warnings.
pub fn downgrade_uec(
    card: &Value,
    target: &str,
    keep_rules: bool,
) -> Result<DowngradeOutcome, CardError> {
    if target != SCHEMA_V1 {
        return Err(CardError::UnsupportedTarget(target.to_string()));
    }

    let source = declared_version(card)?;
    if source == SCHEMA_V1 {
        return Ok(DowngradeOutcome {
            card: normalize_uec(card)?,
            warnings: Vec::new(),
        });
    }
    if source != SCHEMA_V2 {
        return Err(CardError::UnsupportedSource(source.to_string()));
    }

    let mut warnings = Vec::new();
    let mut next = card.clone();

    if let Some(schema) = next.get_mut("schema").and_then(Value::as_object_mut) {
        schema.insert("version".to_string(), Value::String(SCHEMA_V1.to_string()));
    }

    if let Some(payload) = next.get_mut("payload").and_then(Value::as_object_mut) {
        demote_scene(payload);
        fold_prompt_template(payload, &mut warnings);

        for field in DROPPED_V2_FIELDS {
            if payload.remove(field).is_some() {
                tracing::debug!(field, "dropping v2-only payload field");
                warnings.push(format!(
                    "payload.{} is not supported in v1 and was removed",
                    field
                ));
            }
        }

        if !(keep_rules && payload.contains_key("rules")) {
            payload.insert("rules".to_string(), Value::Array(Vec::new()));
        }
    }

    if let Some(meta) = next.get_mut("meta").and_then(Value::as_object_mut) {
        for field in DROPPED_META_FIELDS {
            if meta.remove(field).is_some() {
                warnings.push(format!("meta.{} was removed for v1 compatibility", field));
            }
        }
    }

    Ok(DowngradeOutcome {
        card: next,
        warnings,
    })
}

/// Mirror of the scene promotion: the single v2 scene becomes a one-element
/// list, its id becomes the default, and the selection marker maps back.
fn demote_scene(payload: &mut Map<String, Value>) {
    let Some(scene) = payload.remove("scene") else {
        return;
    };
    let Value::Object(mut scene) = scene else {
        return;
    };

    if let Some(selected) = scene.remove("selectedVariant") {
        let selected = if selected.as_i64() == Some(0) {
            Value::Null
        } else {
            selected
        };
        scene.insert("selectedVariantId".to_string(), selected);
    }

    let scene_id = scene.get("id").cloned();
    payload.insert(
        "scenes".to_string(),
        Value::Array(vec![Value::Object(scene)]),
    );
    if let Some(id) = scene_id {
        payload.insert("defaultSceneId".to_string(), id);
    }
}

/// Fold a prompt-template reference back into the v1 inline convention, but
/// only when no real prompt text would be overwritten. Absent, `null` and
/// empty-string prompts all count as empty. The warning fires either way:
/// the field is gone from the v1 document.
fn fold_prompt_template(payload: &mut Map<String, Value>, warnings: &mut Vec<String>) {
    let Some(template) = payload.remove("promptTemplateId") else {
        return;
    };

    let prompt_is_empty = match payload.get("systemPrompt") {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    };

    if prompt_is_empty {
        if let Some(id) = template.as_str() {
            payload.insert(
                "systemPrompt".to_string(),
                Value::String(format!("{}{}", TEMPLATE_PREFIX, id)),
            );
        }
    }

    warnings.push(
        "payload.promptTemplateId was folded into systemPrompt where possible and removed"
            .to_string(),
    );
}
