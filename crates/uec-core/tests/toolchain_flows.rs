use serde_json::{json, Value};
use uec_core::protocol::{AssetRefKind, DiffOp, MergeOptions};
use uec_core::{
    diff_uec, extract_assets, lint_uec, merge_uec, normalize_uec, parse_uec, rewrite_assets,
    stringify_uec, validate_uec,
};

fn v2_card_with_assets() -> Value {
    json!({
        "schema": { "name": "UEC", "version": "2.0" },
        "kind": "character",
        "payload": {
            "id": "asset-1",
            "name": "Asset",
            "avatar": "https://example.com/avatar.png",
            "chatBackground": {
                "type": "remote_url",
                "url": "https://example.com/bg.png"
            }
        }
    })
}

#[test]
fn stringify_then_parse_round_trips_and_revalidates() {
    let card = v2_card_with_assets();
    let text = stringify_uec(&card, 2).expect("serialization succeeds");

    let outcome = parse_uec(&text, false);
    assert!(outcome.ok, "errors: {:?}", outcome.errors);

    let value = outcome.value.expect("value present on success");
    assert!(validate_uec(&value, false).ok);
    assert_eq!(value["payload"]["id"], json!("asset-1"));
}

#[test]
fn normalized_documents_are_a_diff_fixed_point() {
    let card = v2_card_with_assets();
    let normalized = normalize_uec(&card).expect("normalization succeeds");
    let again = normalize_uec(&normalized).expect("normalization is repeatable");
    assert_eq!(normalized, again);
    assert!(diff_uec(&normalized, &again).unwrap().is_empty());
}

#[test]
fn diff_pinpoints_edits_between_card_revisions() {
    let before = v2_card_with_assets();
    let mut after = before.clone();
    after["payload"]["name"] = json!("Renamed");
    after["payload"]["nickname"] = json!("Nick");

    let entries = diff_uec(&before, &after).unwrap();
    let name = entries
        .iter()
        .find(|e| e.path == "payload.name")
        .expect("name change reported");
    assert_eq!(name.op, DiffOp::Changed);
    assert_eq!(name.before, Some(json!("Asset")));
    assert_eq!(name.after, Some(json!("Renamed")));

    let nickname = entries
        .iter()
        .find(|e| e.path == "payload.nickname")
        .expect("nickname addition reported");
    assert_eq!(nickname.op, DiffOp::Added);
}

#[test]
fn merge_resolves_concurrent_edits_with_conflict_report() {
    let base = v2_card_with_assets();
    let mut ours = base.clone();
    ours["payload"]["name"] = json!("Ours");
    let mut theirs = base.clone();
    theirs["payload"]["name"] = json!("Theirs");
    theirs["payload"]["creator"] = json!("them");

    let outcome = merge_uec(&ours, &theirs, MergeOptions::default()).unwrap();
    assert_eq!(outcome.value["payload"]["name"], json!("Theirs"));
    assert_eq!(outcome.value["payload"]["creator"], json!("them"));
    assert_eq!(outcome.conflicts, vec!["payload.name"]);
}

#[test]
fn asset_rewrite_changes_only_the_string_branch() {
    let card = v2_card_with_assets();

    let assets = extract_assets(&card).unwrap();
    assert_eq!(assets.len(), 2);
    assert!(assets
        .iter()
        .any(|a| a.path == "payload.avatar" && a.kind == AssetRefKind::String));
    assert!(assets
        .iter()
        .any(|a| a.path == "payload.chatBackground" && a.kind == AssetRefKind::Locator));

    let rewritten = rewrite_assets(&card, |asset| match asset.kind {
        AssetRefKind::String => Value::String(
            asset
                .value
                .as_str()
                .unwrap_or_default()
                .replace("example.com", "cdn.example.com"),
        ),
        AssetRefKind::Locator => asset.value,
    })
    .unwrap();

    assert_eq!(
        rewritten["payload"]["avatar"],
        json!("https://cdn.example.com/avatar.png")
    );
    assert_eq!(
        rewritten["payload"]["chatBackground"],
        card["payload"]["chatBackground"]
    );
}

#[test]
fn lint_flags_quality_issues_without_blocking_validation() {
    let mut card = v2_card_with_assets();
    card["payload"]["description"] = json!("");
    card["payload"]["createdAt"] = json!(30);
    card["payload"]["updatedAt"] = json!(20);

    assert!(validate_uec(&card, false).ok, "lint findings are not errors");

    let report = lint_uec(&card);
    assert!(!report.ok);
    assert!(report.warnings.iter().any(|w| w.contains("empty string")));
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("payload.createdAt is greater")));
}
