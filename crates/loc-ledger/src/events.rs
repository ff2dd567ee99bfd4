use loc_schemas::{encode_record, LocError, LocRecord};

use crate::LedgerStub;

/// A named state-change notification as the platform delivers it to
/// subscribers: the event name plus the encoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: String,
    pub payload: Vec<u8>,
}

/// Publishes state-change notifications through the platform event slot.
///
/// A failed publish fails the invocation; it is never swallowed.
pub struct EventEmitter<'s, S: LedgerStub> {
    stub: &'s mut S,
}

impl<'s, S: LedgerStub> EventEmitter<'s, S> {
    pub fn new(stub: &'s mut S) -> Self {
        Self { stub }
    }

    /// Publish `event` carrying `record`, which must be the post-transition
    /// record.
    pub fn publish(&mut self, event: &str, record: &LocRecord) -> Result<(), LocError> {
        let payload = encode_record(record)?;
        self.stub
            .set_event(event, payload)
            .map_err(|e| LocError::NotificationError {
                event: event.to_string(),
                reason: e.to_string(),
            })
    }
}
