//! History replay.
//!
//! A record's audit trail must be exactly the prefix of the transition table
//! that leads to its current status. `verify_history` replays it and reports
//! the first entry that does not fit. Pure: no I/O, no clock.

use loc_schemas::{split_audit_entry, LocRecord};

use crate::transition::TRANSITIONS;

/// Result of replaying a record's history and document hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCheck {
    /// History matches the status; `transitions` entries were replayed.
    Consistent { transitions: usize },
    /// `field` (`"history"` or `"documentHashes"`) diverges at `index`.
    Broken {
        field: &'static str,
        index: usize,
        reason: String,
    },
}

impl HistoryCheck {
    pub fn is_consistent(&self) -> bool {
        matches!(self, HistoryCheck::Consistent { .. })
    }
}

pub fn verify_history(record: &LocRecord) -> HistoryCheck {
    let applied = &TRANSITIONS[..=record.status.ordinal()];

    if record.history.len() != applied.len() {
        return HistoryCheck::Broken {
            field: "history",
            index: record.history.len().min(applied.len()),
            reason: format!(
                "status {} implies {} entries, found {}",
                record.status,
                applied.len(),
                record.history.len()
            ),
        };
    }

    for (i, (entry, rule)) in record.history.iter().zip(applied).enumerate() {
        if let Err(reason) = check_entry(entry, rule.history_tag) {
            return HistoryCheck::Broken {
                field: "history",
                index: i,
                reason,
            };
        }
    }

    let doc_tags: Vec<&str> = applied.iter().filter_map(|r| r.document_tag).collect();
    if record.document_hashes.len() != doc_tags.len() {
        return HistoryCheck::Broken {
            field: "documentHashes",
            index: record.document_hashes.len().min(doc_tags.len()),
            reason: format!(
                "status {} implies {} document hashes, found {}",
                record.status,
                doc_tags.len(),
                record.document_hashes.len()
            ),
        };
    }
    for (i, (entry, tag)) in record.document_hashes.iter().zip(&doc_tags).enumerate() {
        if let Err(reason) = check_entry(entry, tag) {
            return HistoryCheck::Broken {
                field: "documentHashes",
                index: i,
                reason,
            };
        }
    }

    HistoryCheck::Consistent {
        transitions: applied.len(),
    }
}

fn check_entry(entry: &str, expected_tag: &str) -> Result<(), String> {
    let (org, tag) =
        split_audit_entry(entry).ok_or_else(|| format!("'{entry}' is not <organization>|<tag>"))?;
    if org.is_empty() {
        return Err(format!("'{entry}' has no organization"));
    }
    if tag != expected_tag {
        return Err(format!("expected tag {expected_tag}, found {tag}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loc_schemas::{audit_entry, LocStatus, LocTerms};

    fn requested() -> LocRecord {
        LocRecord::requested("L", LocTerms::default(), audit_entry("B", "LOC_Requested"))
    }

    #[test]
    fn fresh_record_is_consistent() {
        assert_eq!(
            verify_history(&requested()),
            HistoryCheck::Consistent { transitions: 1 }
        );
    }

    #[test]
    fn skipped_step_is_detected() {
        let mut r = requested();
        r.status = LocStatus::Accepted;
        r.history.push("I|LOC_Issued".into());
        r.history.push("S|Shipped_Goods".into());
        match verify_history(&r) {
            HistoryCheck::Broken { field, index, .. } => {
                assert_eq!(field, "history");
                assert_eq!(index, 2);
            }
            other => panic!("expected Broken, got {other:?}"),
        }
    }

    #[test]
    fn status_ahead_of_history_is_detected() {
        let mut r = requested();
        r.status = LocStatus::Issued;
        assert!(!verify_history(&r).is_consistent());
    }

    #[test]
    fn missing_document_hash_is_detected() {
        let mut r = requested();
        r.status = LocStatus::Shipped;
        r.history.extend([
            "I|LOC_Issued".to_string(),
            "S|LOC_Accepted".to_string(),
            "S|Shipped_Goods".to_string(),
        ]);
        match verify_history(&r) {
            HistoryCheck::Broken { field, index, .. } => {
                assert_eq!(field, "documentHashes");
                assert_eq!(index, 0);
            }
            other => panic!("expected Broken, got {other:?}"),
        }
        r.document_hashes.push("S|Docs_Passed".into());
        assert_eq!(verify_history(&r), HistoryCheck::Consistent { transitions: 4 });
    }

    #[test]
    fn malformed_entry_is_detected() {
        let mut r = requested();
        r.history[0] = "LOC_Requested".into();
        assert!(!verify_history(&r).is_consistent());
        r.history[0] = "|LOC_Requested".into();
        assert!(!verify_history(&r).is_consistent());
    }
}
