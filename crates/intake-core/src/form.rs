//! Client form state and its persistence.

use tracing::warn;

use crate::error::{IntakeError, StorageError};
use crate::intake::{IntakeField, IntakeRecord};
use crate::storage::KeyValueStore;

/// Storage key holding the serialized intake record.
pub const FORM_KEY: &str = "intake.form";

/// Serialize a record for storage.
pub fn encode_record(record: &IntakeRecord) -> Result<String, StorageError> {
    Ok(serde_json::to_string(record)?)
}

/// Deserialize a stored record.
pub fn decode_record(raw: &str) -> Result<IntakeRecord, StorageError> {
    Ok(serde_json::from_str(raw)?)
}

/// Owns the intake record for one session and writes it through on every
/// change.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    record: IntakeRecord,
}

impl FormStore {
    /// Restore the form from storage, or start empty.
    ///
    /// A stored value that no longer decodes is logged and ignored.
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Result<Self, StorageError> {
        let record = match storage.get(FORM_KEY)? {
            Some(raw) => decode_record(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "Discarding unreadable saved form");
                IntakeRecord::default()
            }),
            None => IntakeRecord::default(),
        };
        Ok(Self { record })
    }

    /// The current record.
    pub fn record(&self) -> &IntakeRecord {
        &self.record
    }

    /// Update one field and persist.
    pub fn set<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        field: IntakeField,
        value: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut next = self.record.clone();
        next.set(field, value);
        self.replace(storage, next)
    }

    /// Replace the whole record and persist. On a failed write the
    /// previous record stays in place.
    pub fn replace<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        record: IntakeRecord,
    ) -> Result<(), StorageError> {
        storage.set(FORM_KEY, encode_record(&record)?)?;
        self.record = record;
        Ok(())
    }

    /// Reset to an empty record and drop the saved copy.
    pub fn clear<S: KeyValueStore + ?Sized>(&mut self, storage: &mut S) -> Result<(), StorageError> {
        storage.remove(FORM_KEY)?;
        self.record = IntakeRecord::default();
        Ok(())
    }

    /// Check required fields before submission.
    ///
    /// Only presence is checked; values are never interpreted.
    pub fn validate_for_submit(&self) -> Result<&IntakeRecord, IntakeError> {
        match self.record.missing_required().first() {
            Some(field) => Err(IntakeError::Validation(format!(
                "{} is required",
                field.label()
            ))),
            None => Ok(&self.record),
        }
    }
}
