//! Reusable sub-shape validators: asset locators, scenes and variants, voice
//! configs, character books. All of them accumulate dotted-path errors and
//! never fail.

use serde_json::{Map, Value};

use crate::value::{
    index_path, is_number, is_object, is_string, join_path, optional_bool, optional_number,
    optional_object, optional_string, optional_string_array,
};

pub(crate) const ASSET_LOCATOR_TYPES: [&str; 3] = ["inline_base64", "remote_url", "asset_ref"];

/// Field-level checker for one JSON object: every method verifies one key
/// against a shape and pushes a `"<path>.<key>: <message>"` error on mismatch.
/// `strict_*` methods additionally require presence, and only fire in strict
/// mode.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
    errors: &'a mut Vec<String>,
    strict: bool,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(
        map: &'a Map<String, Value>,
        path: &'a str,
        errors: &'a mut Vec<String>,
        strict: bool,
    ) -> Self {
        Fields {
            map,
            path,
            errors,
            strict,
        }
    }

    fn push(&mut self, key: &str, message: &str) {
        self.errors
            .push(format!("{}: {}", join_path(self.path, key), message));
    }

    pub(crate) fn required_string(&mut self, key: &str) {
        if !self.map.get(key).is_some_and(is_string) {
            self.push(key, "must be a string");
        }
    }

    pub(crate) fn required_number(&mut self, key: &str) {
        if !self.map.get(key).is_some_and(is_number) {
            self.push(key, "must be a number");
        }
    }

    pub(crate) fn optional_string(&mut self, key: &str) {
        if !optional_string(self.map.get(key)) {
            self.push(key, "must be a string or null");
        }
    }

    pub(crate) fn optional_number(&mut self, key: &str) {
        if !optional_number(self.map.get(key)) {
            self.push(key, "must be a number");
        }
    }

    pub(crate) fn optional_bool(&mut self, key: &str) {
        if !optional_bool(self.map.get(key)) {
            self.push(key, "must be a boolean");
        }
    }

    pub(crate) fn optional_object(&mut self, key: &str) {
        if !optional_object(self.map.get(key)) {
            self.push(key, "must be an object if provided");
        }
    }

    pub(crate) fn optional_string_array(&mut self, key: &str) {
        if !optional_string_array(self.map.get(key)) {
            self.push(key, "must be an array of strings");
        }
    }

    pub(crate) fn strict_string(&mut self, key: &str) {
        if self.strict && !self.map.get(key).is_some_and(is_string) {
            self.push(key, "is required in strict mode");
        }
    }

    pub(crate) fn strict_number(&mut self, key: &str) {
        if self.strict && !self.map.get(key).is_some_and(is_number) {
            self.push(key, "is required in strict mode");
        }
    }

    pub(crate) fn strict_array(&mut self, key: &str) {
        if self.strict && !matches!(self.map.get(key), Some(Value::Array(_))) {
            self.push(key, "is required in strict mode");
        }
    }

    pub(crate) fn strict_object(&mut self, key: &str) {
        if self.strict && !self.map.get(key).is_some_and(is_object) {
            self.push(key, "is required in strict mode");
        }
    }
}

/// Asset locators accept the legacy bare-string form, `null`, absence, or a
/// typed object discriminated by `type` with one required companion field.
pub(crate) fn check_asset_locator(value: Option<&Value>, path: &str, errors: &mut Vec<String>) {
    let Some(value) = value else {
        return;
    };

    if matches!(value, Value::Null | Value::String(_)) {
        return;
    }

    let Value::Object(map) = value else {
        errors.push(format!("{}: must be a string, object, or null", path));
        return;
    };

    let locator_type = map.get("type").and_then(Value::as_str);
    let Some(locator_type) = locator_type.filter(|t| ASSET_LOCATOR_TYPES.contains(t)) else {
        errors.push(format!(
            "{}.type: must be one of: inline_base64, remote_url, asset_ref",
            path
        ));
        return;
    };

    if !optional_string(map.get("mimeType")) {
        errors.push(format!("{}.mimeType: must be a string if provided", path));
    }

    let required = match locator_type {
        "inline_base64" => "data",
        "remote_url" => "url",
        _ => "assetId",
    };
    if !map.get(required).is_some_and(is_string) {
        errors.push(format!(
            "{}.{}: is required for {}",
            path, required, locator_type
        ));
    }
}

fn check_variant(variant: &Value, path: &str, errors: &mut Vec<String>) {
    let Value::Object(map) = variant else {
        errors.push(format!("{}: must be an object", path));
        return;
    };

    let mut fields = Fields::new(map, path, errors, false);
    fields.required_string("id");
    fields.required_string("content");
    fields.required_number("createdAt");
}

/// Shared scene core; returns the object map when the scene is one, so the
/// per-version tails can inspect the selection field.
fn check_scene_base<'a>(
    scene: &'a Value,
    path: &str,
    errors: &mut Vec<String>,
) -> Option<&'a Map<String, Value>> {
    let Value::Object(map) = scene else {
        errors.push(format!("{}: must be an object", path));
        return None;
    };

    {
        let mut fields = Fields::new(map, path, errors, false);
        fields.required_string("id");
        fields.required_string("content");
        fields.optional_string("direction");
        fields.optional_number("createdAt");
    }

    match map.get("variants") {
        None => {}
        Some(Value::Array(items)) => {
            for (index, variant) in items.iter().enumerate() {
                let variant_path = index_path(&join_path(path, "variants"), index);
                check_variant(variant, &variant_path, errors);
            }
        }
        Some(_) => errors.push(format!("{}.variants: must be an array", path)),
    }

    Some(map)
}

pub(crate) fn check_scene_v1(scene: &Value, path: &str, errors: &mut Vec<String>) {
    let Some(map) = check_scene_base(scene, path, errors) else {
        return;
    };

    if let Some(selected) = map.get("selectedVariantId") {
        if !matches!(selected, Value::Null | Value::String(_)) {
            errors.push(format!(
                "{}.selectedVariantId: must be a string or null",
                path
            ));
        }
    }
}

pub(crate) fn check_scene_v2(scene: &Value, path: &str, errors: &mut Vec<String>) {
    let Some(map) = check_scene_base(scene, path, errors) else {
        return;
    };

    if let Some(selected) = map.get("selectedVariant") {
        let is_zero = selected.as_i64() == Some(0);
        if !is_zero && !is_string(selected) {
            errors.push(format!(
                "{}.selectedVariant: must be 0 or a variant id string",
                path
            ));
        }
    }
}

/// v1 voice configs require the full provider/voice pair alongside `source`.
pub(crate) fn check_voice_config_v1(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(value) = value else {
        return;
    };

    let Value::Object(map) = value else {
        errors.push("payload.voiceConfig: must be an object".to_string());
        return;
    };

    let mut fields = Fields::new(map, "payload.voiceConfig", errors, false);
    fields.required_string("source");
    fields.required_string("providerId");
    fields.required_string("voiceId");
}

/// v2 voice configs only require `source`; everything else is optional.
pub(crate) fn check_voice_config_v2(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(value) = value else {
        return;
    };

    let Value::Object(map) = value else {
        errors.push("payload.voiceConfig: must be an object".to_string());
        return;
    };

    let mut fields = Fields::new(map, "payload.voiceConfig", errors, false);
    fields.required_string("source");
    fields.optional_string("providerId");
    fields.optional_string("voiceId");
    fields.optional_string("userVoiceId");
    fields.optional_string("modelId");
    fields.optional_string("voiceName");
}

pub(crate) fn check_character_book(value: Option<&Value>, errors: &mut Vec<String>) {
    let Some(value) = value else {
        return;
    };

    if value.is_null() {
        return;
    }

    let Value::Object(map) = value else {
        errors.push("payload.characterBook: must be an object".to_string());
        return;
    };

    {
        let mut fields = Fields::new(map, "payload.characterBook", errors, false);
        fields.optional_string("name");
        fields.optional_string("description");
    }

    match map.get("entries") {
        None => {}
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let entry_path = index_path("payload.characterBook.entries", index);
                check_book_entry(entry, &entry_path, errors);
            }
        }
        Some(_) => errors.push("payload.characterBook.entries: must be an array".to_string()),
    }
}

fn check_book_entry(entry: &Value, path: &str, errors: &mut Vec<String>) {
    let Value::Object(map) = entry else {
        errors.push(format!("{}: must be an object", path));
        return;
    };

    let mut fields = Fields::new(map, path, errors, false);
    fields.required_string("content");
    fields.optional_string("name");
    fields.optional_string_array("keys");
    fields.optional_string_array("secondary_keys");
    fields.optional_bool("enabled");
    fields.optional_number("insertion_order");
    fields.optional_bool("case_sensitive");
    fields.optional_number("priority");
    fields.optional_bool("constant");
}
