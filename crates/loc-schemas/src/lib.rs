//! loc-schemas
//!
//! Shared data model for the letter-of-credit ledger:
//! - `LocRecord`, the single persisted aggregate (deal terms + status + audit trail)
//! - `LocStatus`, the totally ordered lifecycle
//! - `Operation`, the closed set of ledger functions
//! - `LocError`, the one error surface of the contract and its adapters
//! - the byte-stable JSON codec every replica must agree on
//!
//! Nothing in this crate touches the clock, randomness, or I/O.

mod codec;
mod error;
mod operation;
mod record;

pub use codec::{decode_record, encode_record};
pub use error::LocError;
pub use operation::Operation;
pub use record::{
    audit_entry, split_audit_entry, LocRecord, LocStatus, LocTerms, AUDIT_SEPARATOR,
};
