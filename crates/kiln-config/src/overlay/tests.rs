//! Unit tests for overlay trees.

use rstest::rstest;
use serde_yaml::Value;

use super::*;

fn overlay(yaml: &str) -> OverlayMap {
    let value: Value = serde_yaml::from_str(yaml).expect("valid yaml");
    OverlayMap::from_value(value).expect("mapping root")
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

#[test]
fn from_value_accepts_mapping() {
    let map = overlay("feature:\n  x: 1\n");
    assert!(!map.is_empty());
}

#[test]
fn from_value_normalises_null_to_empty() {
    let map = OverlayMap::from_value(Value::Null).expect("null is empty overlay");
    assert!(map.is_empty());
}

#[rstest]
#[case::sequence("- a\n- b\n")]
#[case::scalar("42\n")]
#[case::string("\"hello\"\n")]
fn from_value_rejects_non_mapping(#[case] yaml: &str) {
    let value: Value = serde_yaml::from_str(yaml).expect("valid yaml");
    let error = OverlayMap::from_value(value).expect_err("non-mapping should fail");
    assert!(matches!(error, SettingsError::InvalidOverlay { .. }));
}

// ---------------------------------------------------------------------------
// Path access
// ---------------------------------------------------------------------------

#[test]
fn get_path_walks_nested_mappings() {
    let map = overlay("a:\n  b:\n    c: true\n");
    assert_eq!(
        map.get_path(&["a", "b", "c"]).and_then(Value::as_bool),
        Some(true)
    );
}

#[test]
fn get_path_returns_none_for_missing_or_non_mapping() {
    let map = overlay("a:\n  b: 1\n");
    assert!(map.get_path(&["a", "missing"]).is_none());
    assert!(map.get_path(&["a", "b", "c"]).is_none());
    assert!(map.get_path(&[]).is_none());
}

#[test]
fn set_path_creates_intermediate_mappings() {
    let mut map = OverlayMap::new();
    map.set_path(&["a", "b"], Value::from(7));
    assert_eq!(map.get_path(&["a", "b"]).and_then(Value::as_i64), Some(7));
}

#[test]
fn set_path_replaces_scalar_intermediates() {
    let mut map = overlay("a: 1\n");
    map.set_path(&["a", "b"], Value::from("x"));
    assert_eq!(map.get_path(&["a", "b"]).and_then(Value::as_str), Some("x"));
}

#[test]
fn remove_path_extracts_leaf_and_keeps_parent() {
    let mut map = overlay("plugins:\n  _disabled:\n    - other\n  color: red\n");
    let removed = map.remove_path(&["plugins", "_disabled"]);
    assert!(removed.is_some());
    assert!(map.get_path(&["plugins", "_disabled"]).is_none());
    assert_eq!(
        map.get_path(&["plugins", "color"]).and_then(Value::as_str),
        Some("red")
    );
}

#[test]
fn remove_path_of_missing_key_is_none() {
    let mut map = overlay("plugins: {}\n");
    assert!(map.remove_path(&["plugins", "_disabled"]).is_none());
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[test]
fn merge_recurses_into_mappings() {
    let mut base = overlay("server:\n  host: localhost\n  port: 80\n");
    let incoming = overlay("server:\n  port: 8080\n");
    base.merge_from(&incoming);
    assert_eq!(
        base.get_path(&["server", "port"]).and_then(Value::as_i64),
        Some(8080)
    );
    assert_eq!(
        base.get_path(&["server", "host"]).and_then(Value::as_str),
        Some("localhost")
    );
}

#[test]
fn merge_replaces_conflicting_scalars_and_sequences() {
    let mut base = overlay("list:\n  - a\nvalue: 1\n");
    let incoming = overlay("list:\n  - b\nvalue: 2\n");
    base.merge_from(&incoming);
    let list = base
        .get_path(&["list"])
        .and_then(Value::as_sequence)
        .expect("sequence");
    assert_eq!(list.len(), 1);
    assert_eq!(base.get_path(&["value"]).and_then(Value::as_i64), Some(2));
}
