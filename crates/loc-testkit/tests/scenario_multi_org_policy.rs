//! Scenario: authorization comes from configuration
//!
//! # Invariants under test
//!
//! 1. An overlay granting a second issuing bank lets either bank issue.
//! 2. The audit entry and event payload name the org that actually called,
//!    not the bank written into the deal terms.
//! 3. Orgs dropped from a grant lose the right on the next invocation.
//! 4. The contract carries the hash of the policy it was built from.

use loc_config::{LocPolicy, UnusedKeyPolicy, DEFAULT_POLICY_YAML};
use loc_contract::LocContract;
use loc_schemas::{decode_record, LocError, Operation};
use loc_testkit::{Harness, ISSUING_BANK};

const SECOND_ISSUER: &str = r#"
contract:
  name: "loc-syndicated"
authorization:
  IssueLOC: ["ICICIBank", "HDFCBank"]
"#;

const ISSUER_REPLACED: &str = r#"
authorization:
  IssueLOC: ["HDFCBank"]
"#;

fn harness(overlay: &str) -> Harness {
    let policy =
        LocPolicy::from_strings(&[DEFAULT_POLICY_YAML, overlay], UnusedKeyPolicy::Fail).unwrap();
    Harness::new(LocContract::new(&policy))
}

#[test]
fn second_issuer_is_recorded_as_the_caller() {
    let mut h = harness(SECOND_ISSUER);
    assert_eq!(h.contract.name(), "loc-syndicated");

    let reference = LocPolicy::reference().unwrap();
    assert_eq!(h.contract.config_hash().len(), 64);
    assert_ne!(h.contract.config_hash(), reference.config_hash);
    assert_eq!(
        Harness::reference().unwrap().contract.config_hash(),
        reference.config_hash
    );

    h.request_reference("LOC1").unwrap();
    h.request_reference("LOC2").unwrap();
    h.invoke(Some("HDFCBank"), "IssueLOC", &["LOC1"]).unwrap();
    h.invoke(Some(ISSUING_BANK), "IssueLOC", &["LOC2"]).unwrap();

    let r1 = h.record("LOC1").unwrap();
    assert_eq!(r1.issuing_bank, ISSUING_BANK, "terms are not rewritten");
    assert_eq!(r1.history[1], "HDFCBank|LOC_Issued");
    assert_eq!(h.record("LOC2").unwrap().history[1], "ICICIBank|LOC_Issued");

    let payload = decode_record(&h.events()[0].payload).unwrap();
    assert_eq!(payload, r1);
}

#[test]
fn replaced_grant_revokes_the_old_issuer() {
    let mut h = harness(ISSUER_REPLACED);
    h.request_reference("LOC1").unwrap();

    let err = h.invoke(Some(ISSUING_BANK), "IssueLOC", &["LOC1"]).unwrap_err();
    assert_eq!(
        err,
        LocError::PermissionDenied {
            operation: Operation::IssueLOC,
            caller: ISSUING_BANK.to_string(),
        }
    );
    h.invoke(Some("HDFCBank"), "IssueLOC", &["LOC1"]).unwrap();
}
