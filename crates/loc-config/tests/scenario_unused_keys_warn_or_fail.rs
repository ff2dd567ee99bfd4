use loc_config::{
    load_layered_yaml_from_strings, report_unused_keys, LocPolicy, UnusedKeyPolicy,
    DEFAULT_POLICY_YAML,
};

/// scenario_unused_keys_warn_or_fail
///
/// Validates:
/// 1) The reference policy is clean.
/// 2) Unused keys are detected in WARN mode but do not error.
/// 3) Unused keys cause failure in FAIL mode.
/// 4) Near-miss section names are not treated as consumed.
/// 5) Policy loading runs the guard itself: FAIL rejects a misspelled
///    section, WARN keeps the report on the policy.

#[test]
fn reference_policy_is_clean() {
    let loaded = load_layered_yaml_from_strings(&[DEFAULT_POLICY_YAML]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("reference policy must not carry unused keys");
    assert!(report.is_clean());
    assert_eq!(report.consumed_prefixes, vec!["/authorization", "/contract"]);
}

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r#"
authorisation:
  IssueLOC: ["ICICIBank"]
metrics:
  enabled: true
"#;
    let loaded = load_layered_yaml_from_strings(&[DEFAULT_POLICY_YAML, yaml]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/authorisation/IssueLOC/0".to_string(), "/metrics/enabled".to_string()]
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let loaded =
        load_layered_yaml_from_strings(&[DEFAULT_POLICY_YAML, "contractor:\n  name: x\n"]).unwrap();
    let err = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("CONFIG_UNUSED_KEYS"), "{msg}");
    assert!(msg.contains("/contractor/name"), "{msg}");
}

const MISSPELLED: &str = r#"
authorisation:
  IssueLOC: ["HDFCBank"]
"#;

#[test]
fn policy_load_fails_on_misspelled_section() {
    let err = LocPolicy::from_strings(&[DEFAULT_POLICY_YAML, MISSPELLED], UnusedKeyPolicy::Fail)
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("CONFIG_UNUSED_KEYS"), "{msg}");
    assert!(msg.contains("/authorisation/IssueLOC/0"), "{msg}");
}

#[test]
fn policy_load_warn_mode_keeps_report() {
    let policy = LocPolicy::from_strings(&[DEFAULT_POLICY_YAML, MISSPELLED], UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");
    assert_eq!(
        policy.unused_keys.unused_leaf_pointers,
        vec!["/authorisation/IssueLOC/0".to_string()]
    );
    // the misspelled grant never reached the table
    assert!(!policy.authorization.permits(loc_schemas::Operation::IssueLOC, "HDFCBank"));
}
