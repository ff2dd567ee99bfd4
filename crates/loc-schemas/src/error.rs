use crate::{LocStatus, Operation};

/// Why a ledger invocation failed.
///
/// Every variant aborts the invocation; the hosting ledger discards any write
/// the transaction attempted. Nothing is retried inside the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocError {
    /// The identity capability could not resolve the caller's organization.
    IdentityUnavailable { reason: String },
    /// The caller's organization is not authorized for this operation.
    PermissionDenied { operation: Operation, caller: String },
    RecordNotFound { id: String },
    RecordAlreadyExists { id: String },
    /// The record's current status is not the operation's predecessor status.
    InvalidStateTransition {
        id: String,
        operation: Operation,
        expected: LocStatus,
        actual: LocStatus,
    },
    SerializationError { reason: String },
    StorageError { reason: String },
    NotificationError { event: String, reason: String },
    /// Malformed invocation: unknown function, wrong arity, empty identifier.
    InvalidArgument { reason: String },
}

impl LocError {
    /// Stable machine-readable code, used in log lines and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            LocError::IdentityUnavailable { .. } => "IDENTITY_UNAVAILABLE",
            LocError::PermissionDenied { .. } => "PERMISSION_DENIED",
            LocError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            LocError::RecordAlreadyExists { .. } => "RECORD_ALREADY_EXISTS",
            LocError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            LocError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LocError::StorageError { .. } => "STORAGE_ERROR",
            LocError::NotificationError { .. } => "NOTIFICATION_ERROR",
            LocError::InvalidArgument { .. } => "INVALID_ARGUMENT",
        }
    }
}

impl std::fmt::Display for LocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocError::IdentityUnavailable { reason } => {
                write!(f, "{}: unable to read caller identity: {}", self.kind(), reason)
            }
            LocError::PermissionDenied { operation, caller } => write!(
                f,
                "{}: organization '{}' may not invoke {}",
                self.kind(),
                caller,
                operation
            ),
            LocError::RecordNotFound { id } => write!(f, "{}: LOC '{}'", self.kind(), id),
            LocError::RecordAlreadyExists { id } => write!(f, "{}: LOC '{}'", self.kind(), id),
            LocError::InvalidStateTransition {
                id,
                operation,
                expected,
                actual,
            } => write!(
                f,
                "{}: {} on LOC '{}' requires status {}, found {}",
                self.kind(),
                operation,
                id,
                expected,
                actual
            ),
            LocError::SerializationError { reason } => write!(f, "{}: {}", self.kind(), reason),
            LocError::StorageError { reason } => write!(f, "{}: {}", self.kind(), reason),
            LocError::NotificationError { event, reason } => {
                write!(f, "{}: event {}: {}", self.kind(), event, reason)
            }
            LocError::InvalidArgument { reason } => write!(f, "{}: {}", self.kind(), reason),
        }
    }
}

impl std::error::Error for LocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_leads_with_kind() {
        let e = LocError::InvalidStateTransition {
            id: "LOC1".into(),
            operation: Operation::IssueLOC,
            expected: LocStatus::Requested,
            actual: LocStatus::Issued,
        };
        assert_eq!(
            e.to_string(),
            "INVALID_STATE_TRANSITION: IssueLOC on LOC 'LOC1' requires status Requested, found Issued"
        );

        let e = LocError::PermissionDenied {
            operation: Operation::AcceptLOC,
            caller: "ChaseBank".into(),
        };
        assert!(e.to_string().starts_with("PERMISSION_DENIED"));
        assert!(e.to_string().contains("ChaseBank"));
    }
}
