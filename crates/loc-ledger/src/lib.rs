//! loc-ledger
//!
//! Capabilities the hosting ledger platform supplies to the LOC contract, and
//! the two thin adapters the contract uses on top of them.
//!
//! # Capability boundary
//!
//! ```text
//! LocContract
//!     │
//!     ├── ClientIdentity::msp_id()        caller's organization
//!     │
//!     ├── RecordStore ──► LedgerStub::get_state / put_state
//!     │
//!     └── EventEmitter ─► LedgerStub::set_event
//! ```
//!
//! The contract never owns storage, identity or event fan-out. It receives a
//! [`TransactionContext`] per invocation; whether writes and events become
//! visible is decided by the platform after the invocation returns.

mod events;
mod store;

pub use events::{EventEmitter, Notification};
pub use store::RecordStore;

// ---------------------------------------------------------------------------
// LedgerError
// ---------------------------------------------------------------------------

/// Failure reported by a platform capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    Read { key: String, reason: String },
    Write { key: String, reason: String },
    Event { name: String, reason: String },
    Identity { reason: String },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Read { key, reason } => write!(f, "get_state({key}) failed: {reason}"),
            LedgerError::Write { key, reason } => write!(f, "put_state({key}) failed: {reason}"),
            LedgerError::Event { name, reason } => write!(f, "set_event({name}) failed: {reason}"),
            LedgerError::Identity { reason } => write!(f, "client identity failed: {reason}"),
        }
    }
}

impl std::error::Error for LedgerError {}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Key-value world state plus the event slot of the current transaction.
pub trait LedgerStub {
    /// `Ok(None)` when the key has never been written.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError>;
}

/// Authenticated identity of the invoking client.
pub trait ClientIdentity {
    /// The caller's organization (membership service provider) identifier.
    fn msp_id(&self) -> Result<String, LedgerError>;
}

/// Everything one invocation may touch.
pub trait TransactionContext {
    type Stub: LedgerStub;
    type Identity: ClientIdentity;

    fn stub(&mut self) -> &mut Self::Stub;

    fn client_identity(&self) -> &Self::Identity;
}
