//! Conflict-aware reconciliation of two JSON documents. Merging always
//! produces a usable value; disagreements are reported as data, not errors.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use uec_protocol::{ArrayMerge, ConflictWinner, MergeOptions, MergeOutcome};

use crate::error::CardError;
use crate::value::{join_path, root_path, MAX_DEPTH};

/// Merge `incoming` over `base` under the given policies. Keys present on
/// only one side carry over as-is; a key present on both either recurses
/// (objects), follows the array policy, or records a conflict resolved by the
/// configured winner.
pub fn merge_uec(
    base: &Value,
    incoming: &Value,
    options: MergeOptions,
) -> Result<MergeOutcome, CardError> {
    let mut conflicts = BTreeSet::new();
    let value = walk(base, incoming, "", 0, options, &mut conflicts)?;
    Ok(MergeOutcome {
        value,
        conflicts: conflicts.into_iter().collect(),
    })
}

fn walk(
    base: &Value,
    incoming: &Value,
    path: &str,
    depth: usize,
    options: MergeOptions,
    conflicts: &mut BTreeSet<String>,
) -> Result<Value, CardError> {
    if depth > MAX_DEPTH {
        return Err(CardError::DepthExceeded);
    }

    if base == incoming {
        return Ok(incoming.clone());
    }

    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            let mut keys: BTreeSet<&String> = base_map.keys().collect();
            keys.extend(incoming_map.keys());

            let mut merged = Map::with_capacity(keys.len());
            for key in keys {
                let key_path = join_path(path, key);
                let value = match (base_map.get(key.as_str()), incoming_map.get(key.as_str())) {
                    (Some(b), Some(i)) => walk(b, i, &key_path, depth + 1, options, conflicts)?,
                    (Some(b), None) => b.clone(),
                    (None, Some(i)) => i.clone(),
                    (None, None) => unreachable!("key taken from the union"),
                };
                merged.insert(key.clone(), value);
            }
            Ok(Value::Object(merged))
        }
        (Value::Array(base_items), Value::Array(incoming_items)) => match options.array {
            ArrayMerge::Concat => {
                let mut merged = base_items.clone();
                merged.extend(incoming_items.iter().cloned());
                Ok(Value::Array(merged))
            }
            ArrayMerge::Replace => {
                // base == incoming was ruled out above, so this is a conflict
                // by definition of the replace policy.
                conflicts.insert(root_path(path));
                Ok(Value::Array(incoming_items.clone()))
            }
        },
        _ => {
            conflicts.insert(root_path(path));
            Ok(match options.conflict {
                ConflictWinner::Base => base.clone(),
                ConflictWinner::Incoming => incoming.clone(),
            })
        }
    }
}
