use anyhow::{anyhow, bail, Context, Result};
use loc_schemas::{Operation, AUDIT_SEPARATOR};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::consumption::{report_unused_keys, UnusedKeyPolicy, UnusedKeyReport};
use crate::{load_layered_yaml, load_layered_yaml_from_strings, LoadedConfig};

pub const DEFAULT_CONTRACT_NAME: &str = "loc";

/// Reference deployment: one buyer, one seller, an issuing and an advising bank.
pub const DEFAULT_POLICY_YAML: &str = r#"
contract:
  name: "loc"
authorization:
  RequestLOC: ["TataMotors"]
  IssueLOC: ["ICICIBank"]
  AcceptLOC: ["Tesla"]
  ShipGoods: ["Tesla"]
  VerifyDocuments: ["ChaseBank"]
  ReleasePayment: ["ICICIBank"]
"#;

// ---------------------------------------------------------------------------
// AuthorizationTable
// ---------------------------------------------------------------------------

/// Operation → organizations allowed to invoke it.
///
/// Every state-changing operation has a non-empty entry; read-only operations
/// never appear. Construction validates this, so lookups never need a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationTable {
    grants: BTreeMap<Operation, BTreeSet<String>>,
}

impl AuthorizationTable {
    /// Build from explicit grants.
    ///
    /// Errors when a state-changing operation is missing or has no
    /// organizations, when a read-only operation is listed, or when an
    /// organization name is blank or contains the audit separator `|`.
    pub fn new<I, O, S>(grants: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Operation, O)>,
        O: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: BTreeMap<Operation, BTreeSet<String>> = BTreeMap::new();
        for (op, orgs) in grants {
            if !op.is_state_changing() {
                bail!("authorization.{op}: read-only operations take no authorization entry");
            }
            let set = out.entry(op).or_default();
            for org in orgs {
                let org: String = org.into();
                if org.trim().is_empty() {
                    bail!("authorization.{op}: organization names must not be blank");
                }
                if org.contains(AUDIT_SEPARATOR) {
                    bail!(
                        "authorization.{op}: organization name '{org}' contains \
                         '{AUDIT_SEPARATOR}'"
                    );
                }
                set.insert(org);
            }
        }

        for op in Operation::ALL_STATE_CHANGING {
            match out.get(&op) {
                None => bail!("authorization.{op}: missing entry"),
                Some(set) if set.is_empty() => {
                    bail!("authorization.{op}: at least one organization is required")
                }
                Some(_) => {}
            }
        }

        Ok(Self { grants: out })
    }

    /// The reference deployment table (see [`DEFAULT_POLICY_YAML`]).
    pub fn reference() -> Self {
        Self {
            grants: Operation::ALL_STATE_CHANGING
                .iter()
                .map(|op| {
                    let org = match op {
                        Operation::RequestLOC => "TataMotors",
                        Operation::IssueLOC | Operation::ReleasePayment => "ICICIBank",
                        Operation::AcceptLOC | Operation::ShipGoods => "Tesla",
                        _ => "ChaseBank",
                    };
                    (*op, BTreeSet::from([org.to_string()]))
                })
                .collect(),
        }
    }

    /// Read `/authorization/<Operation>: [org, ...]` from canonical config JSON.
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let section = cfg
            .pointer("/authorization")
            .and_then(Value::as_object)
            .context("config missing authorization section")?;

        let mut grants: Vec<(Operation, Vec<String>)> = Vec::new();
        for (key, orgs) in section {
            let op: Operation = key
                .parse()
                .map_err(|e: String| anyhow!("authorization.{key}: {e}"))?;
            let list = orgs
                .as_array()
                .with_context(|| format!("authorization.{key}: expected a list of organizations"))?;
            let names = list
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).with_context(|| {
                        format!("authorization.{key}: organization names must be strings")
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            grants.push((op, names));
        }

        Self::new(grants)
    }

    /// `true` when `org` may invoke `op`. Read-only operations are never gated
    /// here and always return `false`.
    pub fn permits(&self, op: Operation, org: &str) -> bool {
        self.grants
            .get(&op)
            .map(|set| set.contains(org))
            .unwrap_or(false)
    }

    /// Organizations allowed to invoke `op`, sorted.
    pub fn organizations(&self, op: Operation) -> impl Iterator<Item = &str> {
        self.grants
            .get(&op)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

// ---------------------------------------------------------------------------
// LocPolicy
// ---------------------------------------------------------------------------

/// Effective contract configuration, resolved once before the contract is built.
#[derive(Debug, Clone)]
pub struct LocPolicy {
    pub contract_name: String,
    pub authorization: AuthorizationTable,
    /// SHA-256 of the canonical config; identical across replicas running the
    /// same effective policy.
    pub config_hash: String,
    /// Leaves nothing reads. Always clean under [`UnusedKeyPolicy::Fail`].
    pub unused_keys: UnusedKeyReport,
}

impl LocPolicy {
    pub fn load<P: AsRef<Path>>(paths: &[P], unused: UnusedKeyPolicy) -> Result<Self> {
        Self::from_loaded(&load_layered_yaml(paths)?, unused)
    }

    pub fn from_strings(yaml_docs: &[&str], unused: UnusedKeyPolicy) -> Result<Self> {
        Self::from_loaded(&load_layered_yaml_from_strings(yaml_docs)?, unused)
    }

    /// The reference deployment policy.
    pub fn reference() -> Result<Self> {
        Self::from_strings(&[DEFAULT_POLICY_YAML], UnusedKeyPolicy::Fail)
    }

    /// Resolve the policy from merged config. The unused-key guard runs
    /// first, so a misspelled section fails (or is reported) before the
    /// authorization table is read.
    pub fn from_loaded(loaded: &LoadedConfig, unused: UnusedKeyPolicy) -> Result<Self> {
        let unused_keys = report_unused_keys(&loaded.config_json, unused)?;

        let contract_name = match loaded.config_json.pointer("/contract/name") {
            None => DEFAULT_CONTRACT_NAME.to_string(),
            Some(v) => v
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .context("contract.name must be a non-empty string")?
                .to_string(),
        };

        Ok(Self {
            contract_name,
            authorization: AuthorizationTable::from_config_json(&loaded.config_json)?,
            config_hash: loaded.config_hash.clone(),
            unused_keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_matches_default_yaml() {
        let policy = LocPolicy::reference().unwrap();
        assert_eq!(policy.authorization, AuthorizationTable::reference());
        assert_eq!(policy.contract_name, "loc");
        assert!(policy.unused_keys.is_clean());
    }

    #[test]
    fn read_only_operations_are_never_permitted_by_the_table() {
        let t = AuthorizationTable::reference();
        assert!(!t.permits(Operation::GetLOCStatus, "TataMotors"));
        assert_eq!(t.organizations(Operation::GetLOCHistory).count(), 0);
    }

    #[test]
    fn duplicate_organizations_collapse() {
        let t = AuthorizationTable::new(Operation::ALL_STATE_CHANGING.map(|op| (op, vec!["X", "X"])))
            .unwrap();
        assert_eq!(t.organizations(Operation::IssueLOC).collect::<Vec<_>>(), vec!["X"]);
    }

    #[test]
    fn organization_names_cannot_contain_the_audit_separator() {
        let err = AuthorizationTable::new(
            Operation::ALL_STATE_CHANGING.map(|op| (op, vec!["Org|East"])),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'|'"), "{err}");
    }
}
