use loc_schemas::{decode_record, encode_record, LocError, LocRecord};

use crate::LedgerStub;

/// Record-level view of the world state. Keys are LOC identifiers; values are
/// encoded [`LocRecord`]s.
///
/// No rollback is attempted on failure: the platform discards the writes of a
/// transaction whose invocation returned an error.
pub struct RecordStore<'s, S: LedgerStub> {
    stub: &'s mut S,
}

impl<'s, S: LedgerStub> RecordStore<'s, S> {
    pub fn new(stub: &'s mut S) -> Self {
        Self { stub }
    }

    pub fn load(&self, id: &str) -> Result<Option<LocRecord>, LocError> {
        match self.read(id)? {
            None => Ok(None),
            Some(bytes) => decode_record(&bytes).map(Some),
        }
    }

    /// Like [`load`](Self::load) but absence is `RecordNotFound`.
    pub fn load_existing(&self, id: &str) -> Result<LocRecord, LocError> {
        self.load(id)?.ok_or_else(|| LocError::RecordNotFound { id: id.to_string() })
    }

    pub fn exists(&self, id: &str) -> Result<bool, LocError> {
        Ok(self.read(id)?.is_some())
    }

    /// Persist `record` under `record.id`.
    pub fn save(&mut self, record: &LocRecord) -> Result<(), LocError> {
        let bytes = encode_record(record)?;
        self.stub
            .put_state(&record.id, bytes)
            .map_err(|e| LocError::StorageError { reason: e.to_string() })
    }

    // Empty values are treated as absent: some platforms return an empty
    // slice rather than nothing for unwritten keys.
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>, LocError> {
        let raw = self
            .stub
            .get_state(id)
            .map_err(|e| LocError::StorageError { reason: e.to_string() })?;
        Ok(raw.filter(|b| !b.is_empty()))
    }
}
