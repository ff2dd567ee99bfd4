//! Deterministic in-memory ledger.
//!
//! Models the platform semantics the contract relies on, and nothing more:
//! - reads see committed state only
//! - writes and the event slot are buffered per transaction
//! - a transaction's buffer is applied on commit and dropped on reject
//! - only the last `set_event` of a transaction survives
//!
//! No randomness, no clock. Transaction ids are UUIDv5 over the ledger
//! sequence number and the function name.

use loc_ledger::{ClientIdentity, LedgerError, LedgerStub, Notification, TransactionContext};
use std::collections::BTreeMap;
use uuid::Uuid;

const TX_NAMESPACE: Uuid = Uuid::from_u128(0x6c6f_632d_6c65_6467_6572_2d74_7869_6473);

/// Fault switches for the capability calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_events: bool,
}

/// One entry of the ledger's transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
    pub seq: u64,
    pub tx_id: Uuid,
    pub function: String,
    pub caller: Option<String>,
    /// `true` when the write set was applied.
    pub committed: bool,
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    world: BTreeMap<String, Vec<u8>>,
    events: Vec<Notification>,
    txs: Vec<TxRecord>,
    faults: Faults,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_faults(&mut self, faults: Faults) {
        self.faults = faults;
    }

    /// Open a transaction as `caller`. `None` simulates an identity the
    /// platform cannot resolve.
    pub fn begin(&self, caller: Option<&str>) -> MemoryTx<'_> {
        MemoryTx {
            stub: TxStub {
                world: &self.world,
                faults: self.faults,
                writes: BTreeMap::new(),
                event: None,
            },
            identity: MemoryIdentity {
                msp_id: caller.map(str::to_string),
            },
        }
    }

    /// Apply a write set and log the transaction as committed.
    pub fn commit(&mut self, function: &str, caller: Option<&str>, ws: WriteSet) -> Uuid {
        self.world.extend(ws.writes);
        self.events.extend(ws.event);
        self.log(function, caller, true)
    }

    /// Log the transaction as rejected; its write set is already gone.
    pub fn reject(&mut self, function: &str, caller: Option<&str>) -> Uuid {
        self.log(function, caller, false)
    }

    /// Committed bytes under `key`.
    pub fn state(&self, key: &str) -> Option<&[u8]> {
        self.world.get(key).map(Vec::as_slice)
    }

    /// Write directly into committed state, bypassing the contract.
    /// Used to stage legacy or corrupt records.
    pub fn seed(&mut self, key: &str, value: Vec<u8>) {
        self.world.insert(key.to_string(), value);
    }

    pub fn events(&self) -> &[Notification] {
        &self.events
    }

    pub fn transactions(&self) -> &[TxRecord] {
        &self.txs
    }

    fn log(&mut self, function: &str, caller: Option<&str>, committed: bool) -> Uuid {
        let seq = self.txs.len() as u64;
        let tx_id = Uuid::new_v5(&TX_NAMESPACE, format!("{seq}:{function}").as_bytes());
        self.txs.push(TxRecord {
            seq,
            tx_id,
            function: function.to_string(),
            caller: caller.map(str::to_string),
            committed,
        });
        tx_id
    }
}

/// Buffered effects of one transaction.
#[derive(Debug, Default)]
pub struct WriteSet {
    pub writes: BTreeMap<String, Vec<u8>>,
    pub event: Option<Notification>,
}

pub struct TxStub<'l> {
    world: &'l BTreeMap<String, Vec<u8>>,
    faults: Faults,
    writes: BTreeMap<String, Vec<u8>>,
    event: Option<Notification>,
}

impl LedgerStub for TxStub<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if self.faults.fail_reads {
            return Err(LedgerError::Read {
                key: key.to_string(),
                reason: "injected read fault".to_string(),
            });
        }
        Ok(self.world.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if self.faults.fail_writes {
            return Err(LedgerError::Write {
                key: key.to_string(),
                reason: "injected write fault".to_string(),
            });
        }
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError> {
        if self.faults.fail_events {
            return Err(LedgerError::Event {
                name: name.to_string(),
                reason: "injected event fault".to_string(),
            });
        }
        self.event = Some(Notification {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}

pub struct MemoryIdentity {
    msp_id: Option<String>,
}

impl ClientIdentity for MemoryIdentity {
    fn msp_id(&self) -> Result<String, LedgerError> {
        self.msp_id.clone().ok_or_else(|| LedgerError::Identity {
            reason: "caller certificate carries no MSP id".to_string(),
        })
    }
}

/// An open transaction against a [`MemoryLedger`].
pub struct MemoryTx<'l> {
    stub: TxStub<'l>,
    identity: MemoryIdentity,
}

impl MemoryTx<'_> {
    pub fn into_write_set(self) -> WriteSet {
        WriteSet {
            writes: self.stub.writes,
            event: self.stub.event,
        }
    }
}

impl<'l> TransactionContext for MemoryTx<'l> {
    type Stub = TxStub<'l>;
    type Identity = MemoryIdentity;

    fn stub(&mut self) -> &mut Self::Stub {
        &mut self.stub
    }

    fn client_identity(&self) -> &Self::Identity {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_do_not_see_uncommitted_writes() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin(Some("A"));
        tx.stub().put_state("k", b"v".to_vec()).unwrap();
        assert_eq!(tx.stub().get_state("k").unwrap(), None);

        let ws = tx.into_write_set();
        ledger.commit("Put", Some("A"), ws);
        assert_eq!(ledger.state("k"), Some(&b"v"[..]));
    }

    #[test]
    fn last_event_wins_within_a_transaction() {
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin(Some("A"));
        tx.stub().set_event("FIRST", vec![1]).unwrap();
        tx.stub().set_event("SECOND", vec![2]).unwrap();
        let ws = tx.into_write_set();
        ledger.commit("Emit", Some("A"), ws);
        assert_eq!(ledger.events().len(), 1);
        assert_eq!(ledger.events()[0].name, "SECOND");
    }

    #[test]
    fn tx_ids_are_deterministic_and_distinct() {
        let mut a = MemoryLedger::new();
        let mut b = MemoryLedger::new();
        let a0 = a.reject("IssueLOC", Some("X"));
        let b0 = b.reject("IssueLOC", Some("Y"));
        assert_eq!(a0, b0);
        let a1 = a.reject("IssueLOC", Some("X"));
        assert_ne!(a0, a1);
        assert!(!a.transactions()[1].committed);
    }

    #[test]
    fn missing_identity_is_an_identity_error() {
        let ledger = MemoryLedger::new();
        let tx = ledger.begin(None);
        assert!(matches!(
            tx.client_identity().msp_id(),
            Err(LedgerError::Identity { .. })
        ));
    }
}
