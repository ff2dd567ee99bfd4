//! loc-testkit
//!
//! Test tooling for the LOC contract: a transactional in-memory ledger with
//! fault injection, an invocation harness, and tracing bootstrap. Scenario
//! tests for the whole workspace live under `tests/`.

mod harness;
mod memory_ledger;

pub use harness::{
    reference_terms, Harness, ADVISING_BANK, BUYER, ISSUING_BANK, SELLER,
};
pub use memory_ledger::{
    Faults, MemoryIdentity, MemoryLedger, MemoryTx, TxRecord, TxStub, WriteSet,
};

/// Install a `tracing` subscriber for tests. Honors `RUST_LOG`, defaults to
/// `info`. Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}
