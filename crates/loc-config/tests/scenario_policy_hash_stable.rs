//! Scenario: policy hash stability
//!
//! GREEN when:
//! - Loading the same YAML twice yields the same config_hash.
//! - Reordering keys (including the authorization map) does not change the hash.
//! - An overlay that changes who may issue changes the hash and the table.
//! - Loading from files matches loading from strings.

use loc_config::{load_layered_yaml_from_strings, LocPolicy, UnusedKeyPolicy, DEFAULT_POLICY_YAML};
use loc_schemas::Operation;
use std::io::Write;

const REORDERED: &str = r#"
authorization:
  ReleasePayment: ["ICICIBank"]
  VerifyDocuments: ["ChaseBank"]
  ShipGoods: ["Tesla"]
  AcceptLOC: ["Tesla"]
  IssueLOC: ["ICICIBank"]
  RequestLOC: ["TataMotors"]
contract:
  name: "loc"
"#;

const SECOND_ISSUER: &str = r#"
authorization:
  IssueLOC: ["ICICIBank", "HDFCBank"]
"#;

fn policy(docs: &[&str]) -> anyhow::Result<LocPolicy> {
    LocPolicy::from_strings(docs, UnusedKeyPolicy::Fail)
}

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[DEFAULT_POLICY_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[DEFAULT_POLICY_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_eq!(a.config_hash.len(), 64, "SHA-256 hash should be 64 hex chars");
    assert!(a.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = policy(&[DEFAULT_POLICY_YAML]).unwrap();
    let b = policy(&[REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash, "key order must not affect the hash");
    assert_eq!(a.authorization, b.authorization);
}

#[test]
fn overlay_changes_table_and_hash() {
    let base = policy(&[DEFAULT_POLICY_YAML]).unwrap();
    let merged = policy(&[DEFAULT_POLICY_YAML, SECOND_ISSUER]).unwrap();

    assert_ne!(base.config_hash, merged.config_hash);
    assert!(merged.authorization.permits(Operation::IssueLOC, "HDFCBank"));
    assert!(merged.authorization.permits(Operation::IssueLOC, "ICICIBank"));
    // untouched operations keep their base grants
    assert!(merged.authorization.permits(Operation::ShipGoods, "Tesla"));
    assert!(!merged.authorization.permits(Operation::ReleasePayment, "HDFCBank"));
}

#[test]
fn files_load_like_strings() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("base.yaml");
    let overlay_path = dir.path().join("overlay.yaml");
    std::fs::File::create(&base_path)
        .unwrap()
        .write_all(DEFAULT_POLICY_YAML.as_bytes())
        .unwrap();
    std::fs::File::create(&overlay_path)
        .unwrap()
        .write_all(SECOND_ISSUER.as_bytes())
        .unwrap();

    let from_files = LocPolicy::load(&[&base_path, &overlay_path], UnusedKeyPolicy::Fail).unwrap();
    let from_strings = policy(&[DEFAULT_POLICY_YAML, SECOND_ISSUER]).unwrap();
    assert_eq!(from_files.config_hash, from_strings.config_hash);
    assert_eq!(from_files.authorization, from_strings.authorization);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.yaml");
    let err = LocPolicy::load(&[absent], UnusedKeyPolicy::Fail).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read yaml path"));
}
