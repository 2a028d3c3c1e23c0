//! Generic recursive structural diff over arbitrary JSON values. Inputs are
//! key-sorted first so the comparison never depends on input key order.

use serde_json::Value;
use std::collections::BTreeSet;
use uec_protocol::{DiffEntry, DiffOp};

use crate::error::CardError;
use crate::value::{index_path, join_path, root_path, sort_keys};

/// Compare two documents and report one entry per leaf divergence.
pub fn diff_uec(left: &Value, right: &Value) -> Result<Vec<DiffEntry>, CardError> {
    let left = sort_keys(left)?;
    let right = sort_keys(right)?;
    let mut entries = Vec::new();
    walk(&left, &right, "", &mut entries);
    Ok(entries)
}

fn added(path: String, after: &Value) -> DiffEntry {
    DiffEntry {
        path,
        op: DiffOp::Added,
        before: None,
        after: Some(after.clone()),
    }
}

fn removed(path: String, before: &Value) -> DiffEntry {
    DiffEntry {
        path,
        op: DiffOp::Removed,
        before: Some(before.clone()),
        after: None,
    }
}

fn walk(left: &Value, right: &Value, path: &str, out: &mut Vec<DiffEntry>) {
    if left == right {
        return;
    }

    match (left, right) {
        (Value::Array(left_items), Value::Array(right_items)) => {
            let len = left_items.len().max(right_items.len());
            for index in 0..len {
                let element_path = index_path(path, index);
                match (left_items.get(index), right_items.get(index)) {
                    (Some(before), Some(after)) => walk(before, after, &element_path, out),
                    (None, Some(after)) => out.push(added(element_path, after)),
                    (Some(before), None) => out.push(removed(element_path, before)),
                    (None, None) => unreachable!("index below max length"),
                }
            }
        }
        (Value::Object(left_map), Value::Object(right_map)) => {
            let mut keys: BTreeSet<&String> = left_map.keys().collect();
            keys.extend(right_map.keys());

            for key in keys {
                let key_path = join_path(path, key);
                match (left_map.get(key.as_str()), right_map.get(key.as_str())) {
                    (Some(before), Some(after)) => walk(before, after, &key_path, out),
                    (None, Some(after)) => out.push(added(key_path, after)),
                    (Some(before), None) => out.push(removed(key_path, before)),
                    (None, None) => unreachable!("key taken from the union"),
                }
            }
        }
        _ => out.push(DiffEntry {
            path: root_path(path),
            op: DiffOp::Changed,
            before: Some(left.clone()),
            after: Some(right.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_documents_diff_empty() {
        let value = json!({"a": [1, {"b": true}], "c": null});
        assert!(diff_uec(&value, &value).unwrap().is_empty());
    }

    #[test]
    fn key_order_does_not_matter() {
        let left = json!({"a": 1, "b": 2});
        let right = json!({"b": 2, "a": 1});
        assert!(diff_uec(&left, &right).unwrap().is_empty());
    }

    #[test]
    fn scalars_change_and_keys_add_or_remove() {
        let left = json!({"a": 1, "gone": "x", "nested": {"value": "x"}});
        let right = json!({"a": 2, "fresh": "y", "nested": {"value": "y"}});

        let entries = diff_uec(&left, &right).unwrap();
        let by_path = |p: &str| entries.iter().find(|e| e.path == p).unwrap();

        assert_eq!(by_path("a").op, DiffOp::Changed);
        assert_eq!(by_path("a").before, Some(json!(1)));
        assert_eq!(by_path("a").after, Some(json!(2)));
        assert_eq!(by_path("gone").op, DiffOp::Removed);
        assert_eq!(by_path("fresh").op, DiffOp::Added);
        assert_eq!(by_path("nested.value").op, DiffOp::Changed);
    }

    #[test]
    fn trailing_array_elements_surface_at_their_own_index() {
        let left = json!({"tags": ["a"]});
        let right = json!({"tags": ["a", "b"]});

        let entries = diff_uec(&left, &right).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "tags[1]");
        assert_eq!(entries[0].op, DiffOp::Added);
        assert_eq!(entries[0].after, Some(json!("b")));
    }

    #[test]
    fn reversing_the_diff_swaps_sides() {
        let left = json!({"a": 1, "gone": "x", "deep": [1, 2]});
        let right = json!({"a": 2, "deep": [1]});

        let forward = diff_uec(&left, &right).unwrap();
        let backward = diff_uec(&right, &left).unwrap();
        assert_eq!(forward.len(), backward.len());

        for entry in &forward {
            let mirror = backward.iter().find(|e| e.path == entry.path).unwrap();
            let expected = match entry.op {
                DiffOp::Added => DiffOp::Removed,
                DiffOp::Removed => DiffOp::Added,
                DiffOp::Changed => DiffOp::Changed,
            };
            assert_eq!(mirror.op, expected);
            assert_eq!(mirror.before, entry.after);
            assert_eq!(mirror.after, entry.before);
        }
    }

    #[test]
    fn root_scalar_divergence_is_reported_as_root() {
        let entries = diff_uec(&json!(1), &json!("one")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "root");
        assert_eq!(entries[0].op, DiffOp::Changed);
    }
}
