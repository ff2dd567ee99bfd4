//! loc-contract
//!
//! The letter-of-credit contract: authorization-gated, deterministic state
//! transitions over a single record per LOC.
//!
//! ```text
//! ∅ ─RequestLOC─► Requested ─IssueLOC─► Issued ─AcceptLOC─► Accepted
//!   ─ShipGoods─► Shipped ─VerifyDocuments─► Verified ─ReleasePayment─► Paid
//! ```
//!
//! Every state-changing invocation runs the same pipeline:
//!
//! 1. `AuthorizationGuard` resolves the caller and checks the policy table
//! 2. `RecordStore` loads the record
//! 3. the transition table validates the predecessor status and mutates
//! 4. `RecordStore` persists the whole aggregate
//! 5. `EventEmitter` publishes the post-transition record (where the row has an event)
//!
//! Any failure aborts the invocation. No clock, no randomness, no threads:
//! identical inputs produce identical writes on every replica.

mod audit;
mod contract;
mod dispatch;
mod guard;
mod transition;

pub use audit::{verify_history, HistoryCheck};
pub use contract::LocContract;
pub use dispatch::invoke;
pub use guard::AuthorizationGuard;
pub use transition::{rule_for, TransitionRule, TRANSITIONS};
