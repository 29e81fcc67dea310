//! Tests for the comparison pipeline.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use crate::diff::{self, ChangeType, Options};
use crate::filter;
use crate::masking::Masker;
use crate::parser::parse_yaml;
use crate::resource::{Resource, ResourceKey};

fn parse(input: &str) -> Vec<Resource> {
    parse_yaml(input).expect("test manifests must parse")
}

fn config_map(name: &str, namespace: &str, value: &str) -> String {
    format!(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {}\n  namespace: {}\ndata:\n  k: {}\n",
        name, namespace, value
    )
}

fn secret_with_password(password: &str) -> String {
    format!(
        "apiVersion: v1\nkind: Secret\nmetadata:\n  name: creds\n  namespace: default\ndata:\n  password: {}\n",
        password
    )
}

#[test]
fn test_changed_config_map_round_trip() {
    let base = parse(&config_map("c", "default", "v1"));
    let head = parse(&config_map("c", "default", "v2"));

    let results = diff::objects(&base, &head, &Options::default()).unwrap();

    assert_eq!(results.count(), 1);
    let key = ResourceKey::new("", "ConfigMap", "default", "c");
    let result = results.get(&key).unwrap();
    assert_eq!(result.change_type, ChangeType::Changed);
    assert!(result.diff.contains("v1"));
    assert!(result.diff.contains("v2"));
    assert!(result.diff.starts_with("===== /ConfigMap default/c ======\n"));
}

#[test]
fn test_created_resource() {
    let head = parse("apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\n  namespace: ns\n");

    let results = diff::objects(&[], &head, &Options::default()).unwrap();

    assert_eq!(results.count(), 1);
    let result = results.get(&ResourceKey::new("", "Pod", "ns", "p")).unwrap();
    assert_eq!(result.change_type, ChangeType::Created);
    assert!(result.diff.contains("===== /Pod ns/p ======"));
    assert!(result.diff.contains("+kind: Pod"));
}

#[test]
fn test_deleted_resource() {
    let base = parse("apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\n  namespace: ns\n");

    let results = diff::objects(&base, &[], &Options::default()).unwrap();

    let result = results.get(&ResourceKey::new("", "Pod", "ns", "p")).unwrap();
    assert_eq!(result.change_type, ChangeType::Deleted);
    assert!(result.diff.contains("-kind: Pod"));
}

#[test]
fn test_self_compare_is_all_unchanged() {
    let manifests = format!(
        "{}---\n{}",
        config_map("a", "default", "v"),
        secret_with_password("cGFzc3dvcmQ=")
    );
    let objs = parse(&manifests);

    let results = diff::objects(&objs, &objs, &Options::default()).unwrap();

    assert_eq!(results.count(), 2);
    assert!(!results.has_changes());
    for (_, result) in results.iter() {
        assert_eq!(result.change_type, ChangeType::Unchanged);
        assert_eq!(result.diff, "");
    }
}

#[test]
fn test_map_key_reorder_is_unchanged() {
    let base = parse("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n  a: '1'\n  b: '2'\n");
    let head = parse("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n  b: '2'\n  a: '1'\n");

    let results = diff::objects(&base, &head, &Options::default()).unwrap();
    assert!(!results.has_changes());
}

#[test]
fn test_list_reorder_is_changed() {
    let base = parse("apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec:\n  args:\n    - a\n    - b\n");
    let head = parse("apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec:\n  args:\n    - b\n    - a\n");

    let results = diff::objects(&base, &head, &Options::default()).unwrap();
    assert!(results.has_changes());
}

#[test]
fn test_identity_uniqueness_across_sides() {
    // Same identity in both sides plus one unique to each: three entries.
    let base = parse(&format!(
        "{}---\n{}",
        config_map("shared", "default", "v1"),
        config_map("base-only", "default", "v")
    ));
    let head = parse(&format!(
        "{}---\n{}",
        config_map("shared", "default", "v2"),
        config_map("head-only", "default", "v")
    ));

    let results = diff::objects(&base, &head, &Options::default()).unwrap();

    assert_eq!(results.count(), 3);
    assert_eq!(results.count_by_type(ChangeType::Changed), 1);
    assert_eq!(results.count_by_type(ChangeType::Deleted), 1);
    assert_eq!(results.count_by_type(ChangeType::Created), 1);
}

#[test]
fn test_duplicate_identity_last_write_wins() {
    // Both base documents share an identity; the later one is compared.
    let base = parse(&format!(
        "{}---\n{}",
        config_map("c", "default", "first"),
        config_map("c", "default", "second")
    ));
    let head = parse(&config_map("c", "default", "second"));

    let results = diff::objects(&base, &head, &Options::default()).unwrap();

    assert_eq!(results.count(), 1);
    assert!(!results.has_changes());
}

#[test]
fn test_secret_values_masked_in_diff() {
    let base = parse(&secret_with_password("cGFzc3dvcmQ="));
    let head = parse(&secret_with_password("bmV3"));

    let results = diff::objects(&base, &head, &Options::default()).unwrap();

    let result = results
        .get(&ResourceKey::new("", "Secret", "default", "creds"))
        .unwrap();
    assert_eq!(result.change_type, ChangeType::Changed);
    assert!(!result.diff.contains("cGFzc3dvcmQ="));
    assert!(!result.diff.contains("bmV3"));
    // Two distinct plaintexts: a 16-mask and a 17-mask.
    assert!(result.diff.contains(&"+".repeat(16)));
    assert!(result.diff.contains(&"+".repeat(17)));
}

#[test]
fn test_masking_can_be_disabled() {
    let base = parse(&secret_with_password("cGFzc3dvcmQ="));
    let head = parse(&secret_with_password("bmV3"));

    let opts = Options {
        disable_mask_secrets: true,
        ..Default::default()
    };
    let results = diff::objects(&base, &head, &opts).unwrap();

    let diff_text = results.to_diff_string();
    assert!(diff_text.contains("cGFzc3dvcmQ="));
    assert!(diff_text.contains("bmV3"));
}

#[test]
fn test_invalid_secret_aborts_comparison() {
    let base = parse(&secret_with_password("cGFzc3dvcmQ="));
    let head = parse(
        "apiVersion: v1\nkind: Secret\nmetadata:\n  name: creds\n  namespace: default\ndata:\n  password: 42\n",
    );

    let err = diff::objects(&base, &head, &Options::default()).unwrap_err();
    assert!(err.to_string().contains("password"));
}

#[test]
fn test_exclude_kinds_removes_entries_entirely() {
    let base = parse(&secret_with_password("cGFzc3dvcmQ="));
    let head = parse(&secret_with_password("bmV3"));

    let opts = Options {
        filter: filter::Options {
            exclude_kinds: vec!["Secret".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };
    let results = diff::objects(&base, &head, &opts).unwrap();

    assert!(results.is_empty());
}

#[test]
fn test_label_selector_scopes_comparison() {
    let base = parse(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: a\n  labels:\n    app: web\ndata:\n  k: v1\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: b\ndata:\n  k: v1\n",
    );
    let head = parse(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: a\n  labels:\n    app: web\ndata:\n  k: v2\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: b\ndata:\n  k: v2\n",
    );

    let opts = Options {
        filter: filter::Options {
            label_selector: BTreeMap::from([("app".to_string(), "web".to_string())]),
            ..Default::default()
        },
        ..Default::default()
    };
    let results = diff::objects(&base, &head, &opts).unwrap();

    assert_eq!(results.count(), 1);
    assert_eq!(results.resource_keys()[0].name, "a");
}

#[test]
fn test_context_lines_respected() {
    let many_keys: String = (0..20).map(|i| format!("  k{:02}: same\n", i)).collect();
    let base = parse(&format!(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n{}  target: v1\n",
        many_keys
    ));
    let head = parse(&format!(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n{}  target: v2\n",
        many_keys
    ));

    let zero = Options {
        context: 0,
        ..Default::default()
    };
    let wide = Options {
        context: 10,
        ..Default::default()
    };

    let zero_diff = diff::objects(&base, &head, &zero).unwrap().to_diff_string();
    let wide_diff = diff::objects(&base, &head, &wide).unwrap().to_diff_string();

    assert!(zero_diff.lines().count() < wide_diff.lines().count());
    assert!(!zero_diff.contains("k15"));
    assert!(wide_diff.contains("k15"));
}

#[test]
fn test_yaml_entry_point() {
    let results = diff::yaml(
        &config_map("c", "default", "v1"),
        &config_map("c", "default", "v2"),
        &Options::default(),
    )
    .unwrap();
    assert!(results.has_changes());
}

#[test]
fn test_yaml_reports_parse_failures_per_side() {
    let good = config_map("c", "default", "v");
    let bad = "apiVersion: v1\nkind: Pod\nmetadata: {broken\n";

    let err = diff::yaml(&good, bad, &Options::default()).unwrap_err();
    assert!(err.to_string().contains("head"));

    let err = diff::yaml(bad, &good, &Options::default()).unwrap_err();
    assert!(err.to_string().contains("base"));
}

#[test]
fn test_shared_masker_keeps_masks_consistent_across_runs() {
    let masker = Masker::new();
    let base = parse(&secret_with_password("c2hhcmVk"));
    let head = parse(&secret_with_password("b3RoZXI="));

    let first = diff::objects_with_masker(&base, &head, &Options::default(), &masker).unwrap();
    let second = diff::objects_with_masker(&base, &head, &Options::default(), &masker).unwrap();

    // Same plaintexts, same masker: identical rendered diffs.
    assert_eq!(first.to_diff_string(), second.to_diff_string());
}

#[test]
fn test_diff_output_is_sorted_by_key() {
    let head = parse(
        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: zz\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: aa\n",
    );

    let results = diff::objects(&[], &head, &Options::default()).unwrap();
    let text = results.to_diff_string();

    let config_map_at = text.find("/ConfigMap").unwrap();
    let pod_at = text.find("/Pod").unwrap();
    assert!(config_map_at < pod_at);
}
