//! Transition table and the single mutation path for existing records.
//!
//! Row `i` of [`TRANSITIONS`] produces `LocStatus::LIFECYCLE[i]`. A record in
//! status `s` has therefore had exactly rows `0..=s.ordinal()` applied, which
//! is what `audit::verify_history` replays.

use loc_schemas::{audit_entry, LocError, LocRecord, LocStatus, Operation};

/// One row of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub operation: Operation,
    /// Required current status; `None` means the record must not exist yet.
    pub from: Option<LocStatus>,
    pub to: LocStatus,
    /// Tag of the `<caller>|<tag>` history entry.
    pub history_tag: &'static str,
    /// Tag of the `<caller>|<tag>` document-hash entry, if this step records one.
    pub document_tag: Option<&'static str>,
    /// Notification published after the write, if any.
    pub event: Option<&'static str>,
}

pub static TRANSITIONS: [TransitionRule; 6] = [
    TransitionRule {
        operation: Operation::RequestLOC,
        from: None,
        to: LocStatus::Requested,
        history_tag: "LOC_Requested",
        document_tag: None,
        event: None,
    },
    TransitionRule {
        operation: Operation::IssueLOC,
        from: Some(LocStatus::Requested),
        to: LocStatus::Issued,
        history_tag: "LOC_Issued",
        document_tag: None,
        event: Some("LOC_ISSUED"),
    },
    TransitionRule {
        operation: Operation::AcceptLOC,
        from: Some(LocStatus::Issued),
        to: LocStatus::Accepted,
        history_tag: "LOC_Accepted",
        document_tag: None,
        event: None,
    },
    TransitionRule {
        operation: Operation::ShipGoods,
        from: Some(LocStatus::Accepted),
        to: LocStatus::Shipped,
        history_tag: "Shipped_Goods",
        document_tag: Some("Docs_Passed"),
        event: Some("SHIPPED_GOODS"),
    },
    TransitionRule {
        operation: Operation::VerifyDocuments,
        from: Some(LocStatus::Shipped),
        to: LocStatus::Verified,
        history_tag: "Verified",
        document_tag: Some("Docs_Verified"),
        event: Some("DOCUMENTS_VERIFIED"),
    },
    TransitionRule {
        operation: Operation::ReleasePayment,
        from: Some(LocStatus::Verified),
        to: LocStatus::Paid,
        history_tag: "Paid",
        document_tag: None,
        event: Some("RELEASED_PAYMENTS"),
    },
];

/// The row for `op`; `None` for read-only operations.
pub fn rule_for(op: Operation) -> Option<&'static TransitionRule> {
    TRANSITIONS.iter().find(|r| r.operation == op)
}

/// Advance `record` by `rule`, performed by `caller`.
///
/// Checks the predecessor status, then sets the successor status and appends
/// the history entry (and document-hash entry, when the row has one). On
/// error the record is left untouched.
pub(crate) fn apply(
    record: &mut LocRecord,
    rule: &TransitionRule,
    caller: &str,
) -> Result<(), LocError> {
    let Some(expected) = rule.from else {
        return Err(LocError::InvalidArgument {
            reason: format!("{} creates records; it cannot advance one", rule.operation),
        });
    };

    if record.status != expected {
        return Err(LocError::InvalidStateTransition {
            id: record.id.clone(),
            operation: rule.operation,
            expected,
            actual: record.status,
        });
    }

    record.status = rule.to;
    record.history.push(audit_entry(caller, rule.history_tag));
    if let Some(tag) = rule.document_tag {
        record.document_hashes.push(audit_entry(caller, tag));
    }
    Ok(())
}
