//! Asset discovery and rewriting. An "asset-like" node is either a bare
//! URL / data-URI string or a typed locator object; locator internals are
//! treated as one unit and never walked independently.

use serde_json::{Map, Value};
use uec_protocol::{AssetRef, AssetRefKind};

use crate::error::CardError;
use crate::shapes::ASSET_LOCATOR_TYPES;
use crate::value::{index_path, join_path, MAX_DEPTH};

pub(crate) fn is_asset_string(value: &Value) -> bool {
    value.as_str().is_some_and(|text| {
        text.starts_with("http://") || text.starts_with("https://") || text.starts_with("data:")
    })
}

pub(crate) fn is_locator_object(value: &Value) -> bool {
    value.is_object()
        && value
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| ASSET_LOCATOR_TYPES.contains(&t))
}

fn asset_at(path: &str, kind: AssetRefKind, value: &Value) -> AssetRef {
    AssetRef {
        path: path.to_string(),
        kind,
        value: value.clone(),
    }
}

/// Collect every asset-like node in the document, depth first.
pub fn extract_assets(card: &Value) -> Result<Vec<AssetRef>, CardError> {
    fn collect(
        value: &Value,
        path: &str,
        depth: usize,
        out: &mut Vec<AssetRef>,
    ) -> Result<(), CardError> {
        if depth > MAX_DEPTH {
            return Err(CardError::DepthExceeded);
        }

        if is_asset_string(value) {
            out.push(asset_at(path, AssetRefKind::String, value));
            return Ok(());
        }
        if is_locator_object(value) {
            out.push(asset_at(path, AssetRefKind::Locator, value));
            return Ok(());
        }

        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    collect(item, &index_path(path, index), depth + 1, out)?;
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    collect(item, &join_path(path, key), depth + 1, out)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    let mut out = Vec::new();
    collect(card, "", 0, &mut out)?;
    Ok(out)
}

/// Same traversal as [`extract_assets`], but each matched node is replaced by
/// whatever the mapper returns. Everything else is cloned untouched; the
/// input document is never modified.
pub fn rewrite_assets<F>(card: &Value, mut mapper: F) -> Result<Value, CardError>
where
    F: FnMut(AssetRef) -> Value,
{
    fn rewrite<F>(
        value: &Value,
        path: &str,
        depth: usize,
        mapper: &mut F,
    ) -> Result<Value, CardError>
    where
        F: FnMut(AssetRef) -> Value,
    {
        if depth > MAX_DEPTH {
            return Err(CardError::DepthExceeded);
        }

        if is_asset_string(value) {
            return Ok(mapper(asset_at(path, AssetRefKind::String, value)));
        }
        if is_locator_object(value) {
            return Ok(mapper(asset_at(path, AssetRefKind::Locator, value)));
        }

        match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    out.push(rewrite(item, &index_path(path, index), depth + 1, mapper)?);
                }
                Ok(Value::Array(out))
            }
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, item) in map {
                    out.insert(
                        key.clone(),
                        rewrite(item, &join_path(path, key), depth + 1, mapper)?,
                    );
                }
                Ok(Value::Object(out))
            }
            _ => Ok(value.clone()),
        }
    }

    rewrite(card, "", 0, &mut mapper)
}
