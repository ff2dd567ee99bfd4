//! Record wire format.
//!
//! Compact JSON, fields in declaration order. `serde_json` emits struct fields
//! in a fixed order, so the same record always encodes to the same bytes on
//! every replica.

use crate::{LocError, LocRecord};

pub fn encode_record(record: &LocRecord) -> Result<Vec<u8>, LocError> {
    serde_json::to_vec(record).map_err(|e| LocError::SerializationError {
        reason: format!("encode LOC '{}': {e}", record.id),
    })
}

pub fn decode_record(bytes: &[u8]) -> Result<LocRecord, LocError> {
    serde_json::from_slice(bytes).map_err(|e| LocError::SerializationError {
        reason: format!("decode LOC record: {e}"),
    })
}
