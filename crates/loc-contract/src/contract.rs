use loc_config::LocPolicy;
use loc_ledger::{EventEmitter, RecordStore, TransactionContext};
use loc_schemas::{audit_entry, LocError, LocRecord, LocStatus, LocTerms, Operation};
use tracing::{debug, info, warn};

use crate::audit::{verify_history, HistoryCheck};
use crate::guard::AuthorizationGuard;
use crate::transition::{self, TransitionRule, TRANSITIONS};

/// The letter-of-credit contract.
///
/// Holds only immutable configuration; all state lives behind the
/// [`TransactionContext`] handed to each call, so one instance serves every
/// invocation on every replica.
#[derive(Debug, Clone)]
pub struct LocContract {
    name: String,
    config_hash: String,
    guard: AuthorizationGuard,
}

impl LocContract {
    pub fn new(policy: &LocPolicy) -> Self {
        info!(
            contract = %policy.contract_name,
            config_hash = %policy.config_hash,
            "contract configured"
        );
        let unused = &policy.unused_keys.unused_leaf_pointers;
        if !unused.is_empty() {
            warn!(
                contract = %policy.contract_name,
                unused_leaf_keys = unused.len(),
                first = ?unused.iter().take(12).collect::<Vec<_>>(),
                "CONFIG_UNUSED_KEYS"
            );
        }

        Self {
            name: policy.contract_name.clone(),
            config_hash: policy.config_hash.clone(),
            guard: AuthorizationGuard::new(policy.authorization.clone()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash of the effective policy this contract was built from.
    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// No-op kept for invocation-layer compatibility. Touches no state.
    pub fn init_ledger<C: TransactionContext>(&self, _ctx: &mut C) -> Result<(), LocError> {
        debug!(contract = %self.name, "InitLedger");
        Ok(())
    }

    /// Create a new LOC in `Requested`.
    ///
    /// Fails with `RecordAlreadyExists` rather than overwrite an existing deal.
    pub fn request_loc<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
        terms: LocTerms,
    ) -> Result<LocRecord, LocError> {
        let rule = &TRANSITIONS[0];
        self.run(rule, id, || {
            let caller = self.guard.authorize(rule.operation, ctx.client_identity())?;
            if id.trim().is_empty() {
                return Err(LocError::InvalidArgument {
                    reason: "LOC id must not be empty".to_string(),
                });
            }

            let mut store = RecordStore::new(ctx.stub());
            if store.exists(id)? {
                return Err(LocError::RecordAlreadyExists { id: id.to_string() });
            }

            let record = LocRecord::requested(id, terms, audit_entry(&caller, rule.history_tag));
            store.save(&record)?;
            Ok((caller, record))
        })
    }

    pub fn issue_loc<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<LocRecord, LocError> {
        self.advance(ctx, Operation::IssueLOC, id)
    }

    pub fn accept_loc<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<LocRecord, LocError> {
        self.advance(ctx, Operation::AcceptLOC, id)
    }

    /// Seller attests shipment; records a `Docs_Passed` document hash.
    pub fn ship_goods<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<LocRecord, LocError> {
        self.advance(ctx, Operation::ShipGoods, id)
    }

    /// Advising bank attests the shipping documents; records `Docs_Verified`.
    pub fn verify_documents<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<LocRecord, LocError> {
        self.advance(ctx, Operation::VerifyDocuments, id)
    }

    pub fn release_payment<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<LocRecord, LocError> {
        self.advance(ctx, Operation::ReleasePayment, id)
    }

    /// Authorize → load → check predecessor → mutate → persist → notify.
    ///
    /// Returns the post-transition record, which is also the event payload.
    pub fn advance<C: TransactionContext>(
        &self,
        ctx: &mut C,
        op: Operation,
        id: &str,
    ) -> Result<LocRecord, LocError> {
        let rule = transition::rule_for(op)
            .filter(|r| r.from.is_some())
            .ok_or_else(|| LocError::InvalidArgument {
                reason: format!("{op} is not a transition of an existing LOC"),
            })?;

        self.run(rule, id, || {
            let caller = self.guard.authorize(op, ctx.client_identity())?;

            let mut store = RecordStore::new(ctx.stub());
            let mut record = store.load_existing(id)?;
            transition::apply(&mut record, rule, &caller)?;
            // Records written by earlier contract versions may not replay.
            // Reported, never enforced.
            if let HistoryCheck::Broken { field, index, reason } = verify_history(&record) {
                warn!(
                    contract = %self.name,
                    loc_id = id,
                    field,
                    index,
                    reason = %reason,
                    "history does not replay against the transition table"
                );
            }
            store.save(&record)?;

            if let Some(event) = rule.event {
                EventEmitter::new(ctx.stub()).publish(event, &record)?;
            }
            Ok((caller, record))
        })
    }

    // Logs the outcome of one state-changing invocation. Logging never alters
    // the result.
    fn run<F>(&self, rule: &TransitionRule, id: &str, body: F) -> Result<LocRecord, LocError>
    where
        F: FnOnce() -> Result<(String, LocRecord), LocError>,
    {
        match body() {
            Ok((caller, record)) => {
                info!(
                    contract = %self.name,
                    op = %rule.operation,
                    loc_id = id,
                    caller = %caller,
                    from = ?rule.from,
                    to = %record.status,
                    event = rule.event.unwrap_or("-"),
                    "transition committed"
                );
                Ok(record)
            }
            Err(err) => {
                warn!(
                    contract = %self.name,
                    op = %rule.operation,
                    loc_id = id,
                    kind = err.kind(),
                    error = %err,
                    "transition refused"
                );
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries: no authorization, no writes, no events
    // -----------------------------------------------------------------------

    pub fn get_loc_status<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<LocStatus, LocError> {
        Ok(self.get_loc(ctx, id)?.status)
    }

    pub fn get_loc_history<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<Vec<String>, LocError> {
        Ok(self.get_loc(ctx, id)?.history)
    }

    pub fn get_loc<C: TransactionContext>(
        &self,
        ctx: &mut C,
        id: &str,
    ) -> Result<LocRecord, LocError> {
        let result = RecordStore::new(ctx.stub()).load_existing(id);
        debug!(
            contract = %self.name,
            loc_id = id,
            found = result.is_ok(),
            "query"
        );
        result
    }
}
