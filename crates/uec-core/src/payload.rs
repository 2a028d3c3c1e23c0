//! Per-kind, per-version payload contracts behind one closed dispatch enum.

use serde_json::{Map, Value};
use uec_protocol::{CardKind, SchemaVersion};

use crate::shapes::{
    check_asset_locator, check_character_book, check_scene_v1, check_scene_v2,
    check_voice_config_v1, check_voice_config_v2, Fields,
};
use crate::value::index_path;

/// The four payload contracts, resolved from the declared kind and the
/// detected schema version. Keeping this a closed enum keeps dispatch total:
/// adding a version extends the match, nothing is looked up at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PayloadShape {
    CharacterV1,
    PersonaV1,
    CharacterV2,
    PersonaV2,
}

impl PayloadShape {
    pub(crate) fn resolve(kind: CardKind, version: SchemaVersion) -> Self {
        match (kind, version) {
            (CardKind::Character, SchemaVersion::V1) => PayloadShape::CharacterV1,
            (CardKind::Persona, SchemaVersion::V1) => PayloadShape::PersonaV1,
            (CardKind::Character, SchemaVersion::V2) => PayloadShape::CharacterV2,
            (CardKind::Persona, SchemaVersion::V2) => PayloadShape::PersonaV2,
        }
    }

    pub(crate) fn check(self, payload: &Map<String, Value>, errors: &mut Vec<String>, strict: bool) {
        match self {
            PayloadShape::CharacterV1 => character_v1(payload, errors, strict),
            PayloadShape::PersonaV1 => persona_v1(payload, errors, strict),
            PayloadShape::CharacterV2 => character_v2(payload, errors, strict),
            PayloadShape::PersonaV2 => persona_v2(payload, errors, strict),
        }
    }
}

fn character_v1(payload: &Map<String, Value>, errors: &mut Vec<String>, strict: bool) {
    {
        let mut fields = Fields::new(payload, "payload", errors, strict);
        fields.required_string("id");
        fields.required_string("name");
        fields.optional_string("description");
        fields.optional_string("definitions");
        fields.optional_string_array("tags");
        fields.optional_string("avatar");
        fields.optional_string("chatBackground");
        fields.optional_string_array("rules");
        fields.optional_string("defaultSceneId");
        fields.optional_string("defaultModelId");
        fields.optional_string("systemPrompt");
        fields.optional_bool("voiceAutoplay");
        fields.optional_number("createdAt");
        fields.optional_number("updatedAt");

        fields.strict_string("description");
        fields.strict_array("rules");
        fields.strict_array("scenes");
        fields.strict_number("createdAt");
        fields.strict_number("updatedAt");
    }

    match payload.get("scenes") {
        None => {}
        Some(Value::Array(scenes)) => {
            for (index, scene) in scenes.iter().enumerate() {
                check_scene_v1(scene, &index_path("payload.scenes", index), errors);
            }
        }
        Some(_) => errors.push("payload.scenes: must be an array".to_string()),
    }

    check_voice_config_v1(payload.get("voiceConfig"), errors);
}

fn persona_v1(payload: &Map<String, Value>, errors: &mut Vec<String>, strict: bool) {
    let mut fields = Fields::new(payload, "payload", errors, strict);
    fields.required_string("id");
    fields.required_string("title");
    fields.optional_string("description");
    fields.optional_string("avatar");
    fields.optional_bool("isDefault");
    fields.optional_number("createdAt");
    fields.optional_number("updatedAt");

    fields.strict_string("description");
    fields.strict_number("createdAt");
    fields.strict_number("updatedAt");
}

fn character_v2(payload: &Map<String, Value>, errors: &mut Vec<String>, strict: bool) {
    {
        let mut fields = Fields::new(payload, "payload", errors, strict);
        fields.required_string("id");
        fields.required_string("name");
        fields.optional_string("description");
        fields.optional_string("definitions");
        fields.optional_string_array("tags");
        fields.optional_string("defaultModelId");
        fields.optional_string("fallbackModelId");
        fields.optional_string("systemPrompt");
        fields.optional_string("promptTemplateId");
        fields.optional_string("nickname");
        fields.optional_string("creator");
        fields.optional_string("creatorNotes");
        fields.optional_object("creatorNotesMultilingual");
        fields.optional_bool("voiceAutoplay");
        fields.optional_number("createdAt");
        fields.optional_number("updatedAt");

        fields.strict_string("description");
        fields.strict_object("scene");
        fields.strict_number("createdAt");
        fields.strict_number("updatedAt");
    }

    check_asset_locator(payload.get("avatar"), "payload.avatar", errors);
    check_asset_locator(payload.get("chatBackground"), "payload.chatBackground", errors);

    // `rules` was retired in v2; strict mode calls it out, normal mode
    // tolerates it for documents that predate the migration.
    if strict && payload.contains_key("rules") {
        errors.push(
            "payload.rules: is not a valid field in v2; use systemPrompt or characterBook instead"
                .to_string(),
        );
    }

    if let Some(scene) = payload.get("scene") {
        if !scene.is_null() {
            check_scene_v2(scene, "payload.scene", errors);
        }
    }

    // `source` here is provenance of the character itself, unrelated to
    // `meta.source`.
    if let Some(source) = payload.get("source") {
        let all_strings = matches!(source, Value::Array(items) if items.iter().all(Value::is_string));
        if !all_strings {
            errors.push("payload.source: must be an array of strings".to_string());
        }
    }

    check_voice_config_v2(payload.get("voiceConfig"), errors);
    check_character_book(payload.get("characterBook"), errors);
}

fn persona_v2(payload: &Map<String, Value>, errors: &mut Vec<String>, strict: bool) {
    {
        let mut fields = Fields::new(payload, "payload", errors, strict);
        fields.required_string("id");
        fields.required_string("title");
        fields.optional_string("description");
        fields.optional_bool("isDefault");
        fields.optional_number("createdAt");
        fields.optional_number("updatedAt");

        fields.strict_string("description");
        fields.strict_number("createdAt");
        fields.strict_number("updatedAt");
    }

    check_asset_locator(payload.get("avatar"), "payload.avatar", errors);
}
