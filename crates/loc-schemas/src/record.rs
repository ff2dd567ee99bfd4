use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// LocStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a letter of credit.
///
/// The declaration order IS the lifecycle order; `Ord` is derived from it and
/// a record's status may only ever move to its immediate [`successor`].
///
/// [`successor`]: LocStatus::successor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocStatus {
    Requested,
    Issued,
    Accepted,
    Shipped,
    Verified,
    /// Payment released. **Terminal.**
    Paid,
}

impl LocStatus {
    /// All statuses in lifecycle order.
    pub const LIFECYCLE: [LocStatus; 6] = [
        LocStatus::Requested,
        LocStatus::Issued,
        LocStatus::Accepted,
        LocStatus::Shipped,
        LocStatus::Verified,
        LocStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocStatus::Requested => "Requested",
            LocStatus::Issued => "Issued",
            LocStatus::Accepted => "Accepted",
            LocStatus::Shipped => "Shipped",
            LocStatus::Verified => "Verified",
            LocStatus::Paid => "Paid",
        }
    }

    /// Zero-based position in the lifecycle. A record in this status has had
    /// exactly `ordinal() + 1` successful state-changing operations applied.
    pub fn ordinal(&self) -> usize {
        match self {
            LocStatus::Requested => 0,
            LocStatus::Issued => 1,
            LocStatus::Accepted => 2,
            LocStatus::Shipped => 3,
            LocStatus::Verified => 4,
            LocStatus::Paid => 5,
        }
    }

    /// The only status this one may advance to; `None` once terminal.
    pub fn successor(&self) -> Option<LocStatus> {
        Self::LIFECYCLE.get(self.ordinal() + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LocStatus::Paid)
    }
}

impl fmt::Display for LocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LIFECYCLE
            .iter()
            .find(|st| st.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown LOC status '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Audit entries
// ---------------------------------------------------------------------------

/// Separates organization and tag in an audit entry. Organization names
/// may not contain it.
pub const AUDIT_SEPARATOR: char = '|';

/// Format one audit-trail entry: `<organization>|<eventTag>`.
pub fn audit_entry(org: &str, tag: &str) -> String {
    format!("{org}{AUDIT_SEPARATOR}{tag}")
}

/// Split an audit-trail entry at the first `|`.
///
/// Returns `None` when the separator is missing.
pub fn split_audit_entry(entry: &str) -> Option<(&str, &str)> {
    entry.split_once(AUDIT_SEPARATOR)
}

// ---------------------------------------------------------------------------
// LocTerms / LocRecord
// ---------------------------------------------------------------------------

/// Deal terms supplied by the buyer at request time. Opaque strings: the
/// contract performs no arithmetic or date validation on them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocTerms {
    pub buyer: String,
    pub seller: String,
    pub issuing_bank: String,
    pub advising_bank: String,
    pub amount: String,
    pub currency: String,
    pub expiry_date: String,
    pub goods_description: String,
}

/// The persisted letter-of-credit aggregate.
///
/// Status, document hashes and history live in one value written by one
/// `put_state`, so the history length can never drift from the number of
/// applied transitions.
///
/// Field order is the wire order. Do not reorder fields: replicas compare the
/// encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocRecord {
    #[serde(rename = "locId")]
    pub id: String,
    pub buyer: String,
    pub seller: String,
    pub issuing_bank: String,
    pub advising_bank: String,
    pub amount: String,
    pub currency: String,
    pub expiry_date: String,
    pub goods_description: String,
    pub status: LocStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub document_hashes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<String>,
}

impl LocRecord {
    /// A freshly requested LOC: status `Requested`, no document hashes,
    /// history seeded with the single creation entry.
    pub fn requested(id: impl Into<String>, terms: LocTerms, seed_entry: String) -> Self {
        Self {
            id: id.into(),
            buyer: terms.buyer,
            seller: terms.seller,
            issuing_bank: terms.issuing_bank,
            advising_bank: terms.advising_bank,
            amount: terms.amount,
            currency: terms.currency,
            expiry_date: terms.expiry_date,
            goods_description: terms.goods_description,
            status: LocStatus::Requested,
            document_hashes: Vec::new(),
            history: vec![seed_entry],
        }
    }

    /// Copy of the immutable deal terms.
    pub fn terms(&self) -> LocTerms {
        LocTerms {
            buyer: self.buyer.clone(),
            seller: self.seller.clone(),
            issuing_bank: self.issuing_bank.clone(),
            advising_bank: self.advising_bank.clone(),
            amount: self.amount.clone(),
            currency: self.currency.clone(),
            expiry_date: self.expiry_date.clone(),
            goods_description: self.goods_description.clone(),
        }
    }
}

// Earlier chaincode builds marshalled empty slices as `null`.
fn null_as_empty<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
}
