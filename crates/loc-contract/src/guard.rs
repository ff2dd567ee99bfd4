use loc_config::AuthorizationTable;
use loc_ledger::ClientIdentity;
use loc_schemas::{LocError, Operation};

/// Decides whether the invoking organization may perform an operation.
///
/// The table is fixed when the contract is built; nothing at call time can
/// widen it. Both failure modes abort before any state is read:
///
/// - identity capability error → `IdentityUnavailable`
/// - organization not granted  → `PermissionDenied`
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    table: AuthorizationTable,
}

impl AuthorizationGuard {
    pub fn new(table: AuthorizationTable) -> Self {
        Self { table }
    }

    /// Returns the caller's organization when it is granted `op`.
    pub fn authorize<I: ClientIdentity>(
        &self,
        op: Operation,
        identity: &I,
    ) -> Result<String, LocError> {
        let caller = identity
            .msp_id()
            .map_err(|e| LocError::IdentityUnavailable { reason: e.to_string() })?;

        if self.table.permits(op, &caller) {
            Ok(caller)
        } else {
            Err(LocError::PermissionDenied {
                operation: op,
                caller,
            })
        }
    }
}
