//! Tests for the policy loader module.

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use super::*;

const VALID_POLICY_YAML: &str = r#"
groups:
  - name: network
    annotation: [traffic]
    interval: 10s
    rules:
      - record: high_rx
        expr: vm.rx > 1000
  - name: idle
    rules:
      - record: quiet
        expr: vm.tx < 1
"#;

fn temp_loader(contents: &str) -> (TempDir, PolicyLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("policy.yaml");
    fs::write(&path, contents).unwrap();
    let loader = PolicyLoader::new(path);
    (dir, loader)
}

#[test]
fn load_policy_from_file() {
    let (dir, loader) = temp_loader(VALID_POLICY_YAML);
    assert_eq!(loader.path(), dir.path().join("policy.yaml"));

    let doc = loader.load().unwrap();
    assert_eq!(doc.groups.len(), 2);
    assert_eq!(doc.groups[0].name, "network");
    assert_eq!(
        doc.groups[0].interval(),
        Ok(Some(Duration::from_secs(10)))
    );
    assert_eq!(doc.groups[1].rules[0].expr, "vm.tx < 1");
}

#[test]
fn reload_sees_file_changes() {
    let (_dir, loader) = temp_loader(VALID_POLICY_YAML);
    assert_eq!(loader.load().unwrap().groups.len(), 2);

    fs::write(
        loader.path(),
        "groups:\n  - name: only\n    rules:\n      - record: r\n        expr: x > 1\n",
    )
    .unwrap();
    let doc = loader.load().unwrap();
    assert_eq!(doc.groups.len(), 1);
    assert_eq!(doc.groups[0].name, "only");
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let loader = PolicyLoader::new(dir.path().join("absent.yaml"));
    assert!(matches!(loader.load(), Err(LoadError::Io(_))));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let (_dir, loader) = temp_loader("groups: [name: {");
    assert!(matches!(loader.load(), Err(LoadError::Parse(_))));
}

#[test]
fn wrong_shape_is_parse_error() {
    let err = PolicyLoader::load_str("groups:\n  - rules: []\n").unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn empty_group_name_rejected() {
    let err = PolicyLoader::load_str("groups:\n  - name: \"\"\n    rules: []\n").unwrap_err();
    match err {
        LoadError::Validation(msg) => assert!(msg.contains("groups[0].name")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn duplicate_group_name_rejected() {
    let yaml = "groups:\n  - name: g\n    rules: []\n  - name: g\n    rules: []\n";
    let err = PolicyLoader::load_str(yaml).unwrap_err();
    match err {
        LoadError::Validation(msg) => assert!(msg.contains("duplicate group name 'g'")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn invalid_interval_rejected() {
    let yaml = "groups:\n  - name: g\n    interval: often\n    rules: []\n";
    let err = PolicyLoader::load_str(yaml).unwrap_err();
    match err {
        LoadError::Validation(msg) => assert!(msg.contains("invalid interval 'often'")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn unparseable_expressions_are_loaded() {
    // Expressions are checked per tick, not at load time.
    let yaml = "groups:\n  - name: g\n    rules:\n      - record: r\n        expr: \"x >\"\n";
    let doc = PolicyLoader::load_str(yaml).unwrap();
    assert_eq!(doc.groups[0].rules[0].expr, "x >");
}
