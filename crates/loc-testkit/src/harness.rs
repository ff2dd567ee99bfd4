//! Invocation harness: one contract, one in-memory ledger, and the
//! commit-on-Ok / discard-on-Err rule the hosting platform applies.

use anyhow::Result;
use loc_config::LocPolicy;
use loc_contract::{invoke, LocContract};
use loc_ledger::Notification;
use loc_schemas::{decode_record, LocError, LocRecord, LocTerms};

use crate::memory_ledger::{MemoryLedger, MemoryTx};

pub const BUYER: &str = "TataMotors";
pub const SELLER: &str = "Tesla";
pub const ISSUING_BANK: &str = "ICICIBank";
pub const ADVISING_BANK: &str = "ChaseBank";

/// Terms of the reference deal.
pub fn reference_terms() -> LocTerms {
    LocTerms {
        buyer: BUYER.to_string(),
        seller: SELLER.to_string(),
        issuing_bank: ISSUING_BANK.to_string(),
        advising_bank: ADVISING_BANK.to_string(),
        amount: "100000".to_string(),
        currency: "USD".to_string(),
        expiry_date: "2025-12-31".to_string(),
        goods_description: "EV battery cells".to_string(),
    }
}

pub struct Harness {
    pub contract: LocContract,
    pub ledger: MemoryLedger,
}

impl Harness {
    pub fn new(contract: LocContract) -> Self {
        Self {
            contract,
            ledger: MemoryLedger::new(),
        }
    }

    /// Contract configured with the reference deployment policy.
    pub fn reference() -> Result<Self> {
        Ok(Self::new(LocContract::new(&LocPolicy::reference()?)))
    }

    /// Route `function(args)` through the contract's dispatcher as `caller`.
    pub fn invoke(
        &mut self,
        caller: Option<&str>,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, LocError> {
        self.transact(caller, function, |contract, tx| {
            invoke(contract, tx, function, args)
        })
    }

    /// Run `body` in a fresh transaction as `caller`; commit its writes and
    /// event on `Ok`, discard them on `Err`.
    pub fn transact<T>(
        &mut self,
        caller: Option<&str>,
        function: &str,
        body: impl FnOnce(&LocContract, &mut MemoryTx<'_>) -> Result<T, LocError>,
    ) -> Result<T, LocError> {
        let mut tx = self.ledger.begin(caller);
        let result = body(&self.contract, &mut tx);
        let ws = tx.into_write_set();
        match result {
            Ok(v) => {
                self.ledger.commit(function, caller, ws);
                Ok(v)
            }
            Err(e) => {
                self.ledger.reject(function, caller);
                Err(e)
            }
        }
    }

    /// `RequestLOC` for the reference deal, as the buyer.
    pub fn request_reference(&mut self, id: &str) -> Result<LocRecord, LocError> {
        self.transact(Some(BUYER), "RequestLOC", |c, tx| {
            c.request_loc(tx, id, reference_terms())
        })
    }

    /// Committed record under `id`, if any. Panics on undecodable bytes.
    pub fn record(&self, id: &str) -> Option<LocRecord> {
        self.ledger
            .state(id)
            .map(|b| decode_record(b).expect("committed LOC record must decode"))
    }

    pub fn raw(&self, id: &str) -> Option<Vec<u8>> {
        self.ledger.state(id).map(<[u8]>::to_vec)
    }

    pub fn events(&self) -> &[Notification] {
        self.ledger.events()
    }
}
