//! Follow-up conversation history.
//!
//! Entries are only ever appended or cleared all at once. Requests are
//! ticketed so an answer that arrives after a newer question, or after the
//! history was cleared, is dropped instead of appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key holding the serialized history.
pub const HISTORY_KEY: &str = "intake.follow_up_history";

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpEntry {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl FollowUpEntry {
    /// Create an entry stamped with the current time.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Serialize a history for storage.
pub fn encode_history(entries: &[FollowUpEntry]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(entries)?)
}

/// Deserialize a stored history. Timestamps come back as time values.
pub fn decode_history(raw: &str) -> Result<Vec<FollowUpEntry>, StorageError> {
    Ok(serde_json::from_str(raw)?)
}

/// Sequence number handed out when a follow-up request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpTicket {
    seq: u64,
}

impl FollowUpTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// The ordered follow-up conversation for one session.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: Vec<FollowUpEntry>,
    /// Last sequence number issued.
    issued: u64,
    /// The one ticket whose answer may still be appended.
    pending: Option<u64>,
}

impl ConversationStore {
    /// Rehydrate from storage, or start empty.
    ///
    /// An unreadable stored history is logged and treated as empty.
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Result<Self, StorageError> {
        let entries = match storage.get(HISTORY_KEY)? {
            Some(raw) => decode_history(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "Failed to load follow-up history");
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!(entries = entries.len(), "Loaded follow-up history");
        Ok(Self {
            entries,
            ..Default::default()
        })
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[FollowUpEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start a request. Any earlier outstanding ticket becomes stale.
    pub fn begin(&mut self) -> FollowUpTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        FollowUpTicket { seq: self.issued }
    }

    /// Whether an answer for `ticket` would still be accepted.
    pub fn is_current(&self, ticket: FollowUpTicket) -> bool {
        self.pending == Some(ticket.seq)
    }

    /// Record the answer for `ticket`.
    ///
    /// Returns `Ok(false)` and leaves the history untouched when the ticket
    /// is stale.
    pub fn complete<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        ticket: FollowUpTicket,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<bool, StorageError> {
        if !self.is_current(ticket) {
            warn!(
                seq = ticket.seq,
                latest = self.issued,
                "Dropping stale follow-up answer"
            );
            return Ok(false);
        }
        self.pending = None;
        self.append(storage, FollowUpEntry::new(question, answer))?;
        Ok(true)
    }

    /// Release `ticket` after its request failed.
    pub fn abandon(&mut self, ticket: FollowUpTicket) {
        if self.is_current(ticket) {
            self.pending = None;
        }
    }

    /// Append an entry and persist the whole history.
    pub fn append<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        entry: FollowUpEntry,
    ) -> Result<(), StorageError> {
        let mut next = self.entries.clone();
        next.push(entry);
        storage.set(HISTORY_KEY, encode_history(&next)?)?;
        self.entries = next;
        Ok(())
    }

    /// Drop every entry and the persisted key. Outstanding tickets go stale.
    pub fn clear<S: KeyValueStore + ?Sized>(&mut self, storage: &mut S) -> Result<(), StorageError> {
        self.pending = None;
        storage.remove(HISTORY_KEY)?;
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    /// Reads succeed, every write fails.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_failed_save_leaves_entries_unchanged() {
        let mut seeded = MemoryStore::new();
        seeded
            .set(
                HISTORY_KEY,
                encode_history(&[FollowUpEntry::new("Earlier?", "Yes.")]).unwrap(),
            )
            .unwrap();
        let mut storage = ReadOnlyStore(seeded);
        let mut history = ConversationStore::load(&storage).unwrap();

        let ticket = history.begin();
        assert!(history
            .complete(&mut storage, ticket, "Now?", "Maybe.")
            .is_err());
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].question, "Earlier?");

        assert!(history.clear(&mut storage).is_err());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_append_is_monotonic() {
        let mut storage = MemoryStore::new();
        let mut history = ConversationStore::load(&storage).unwrap();

        for i in 0..5 {
            let ticket = history.begin();
            let appended = history
                .complete(&mut storage, ticket, format!("q{}", i), format!("a{}", i))
                .unwrap();
            assert!(appended);
            assert_eq!(history.len(), i + 1);
        }

        let questions: Vec<_> = history.entries().iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["q0", "q1", "q2", "q3", "q4"]);

        let persisted = decode_history(&storage.get(HISTORY_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, history.entries());
    }

    #[test]
    fn test_timestamps_are_chronological() {
        let mut storage = MemoryStore::new();
        let mut history = ConversationStore::default();
        for _ in 0..3 {
            let ticket = history.begin();
            history.complete(&mut storage, ticket, "q", "a").unwrap();
        }
        let entries = history.entries();
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_clear_empties_and_removes_key() {
        let mut storage = MemoryStore::new();
        let mut history = ConversationStore::default();
        let ticket = history.begin();
        history.complete(&mut storage, ticket, "q", "a").unwrap();
        assert!(storage.contains_key(HISTORY_KEY));

        history.clear(&mut storage).unwrap();
        assert_eq!(history.len(), 0);
        assert!(!storage.contains_key(HISTORY_KEY));

        // Clearing an already empty history is fine.
        history.clear(&mut storage).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_rehydrate_restores_time_values() {
        let mut storage = MemoryStore::new();
        let mut history = ConversationStore::default();
        let ticket = history.begin();
        history
            .complete(&mut storage, ticket, "Is this serious?", "Probably not.")
            .unwrap();
        let original = history.entries()[0].clone();

        let restored = ConversationStore::load(&storage).unwrap();
        assert_eq!(restored.entries(), &[original.clone()]);
        assert_eq!(restored.entries()[0].timestamp, original.timestamp);
    }

    #[test]
    fn test_decode_rfc3339_timestamp() {
        let entries = decode_history(
            r#"[{"question":"q","answer":"a","timestamp":"2024-05-01T10:30:00.000Z"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].timestamp.to_rfc3339(), "2024-05-01T10:30:00+00:00");
    }

    #[test]
    fn test_stale_ticket_dropped() {
        let mut storage = MemoryStore::new();
        let mut history = ConversationStore::default();

        let first = history.begin();
        let second = history.begin();
        assert!(!history.is_current(first));

        // Second answer resolves first, then the stale first answer arrives.
        assert!(history.complete(&mut storage, second, "q2", "a2").unwrap());
        assert!(!history.complete(&mut storage, first, "q1", "a1").unwrap());
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].question, "q2");
    }

    #[test]
    fn test_clear_invalidates_pending_ticket() {
        let mut storage = MemoryStore::new();
        let mut history = ConversationStore::default();

        let ticket = history.begin();
        history.clear(&mut storage).unwrap();

        assert!(!history.complete(&mut storage, ticket, "q", "late").unwrap());
        assert!(history.is_empty());
        assert!(!storage.contains_key(HISTORY_KEY));
    }

    #[test]
    fn test_ticket_completes_once() {
        let mut storage = MemoryStore::new();
        let mut history = ConversationStore::default();

        let ticket = history.begin();
        assert!(history.complete(&mut storage, ticket, "q", "a").unwrap());
        assert!(!history.complete(&mut storage, ticket, "q", "a").unwrap());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_abandon_releases_ticket() {
        let mut history = ConversationStore::default();
        let ticket = history.begin();
        history.abandon(ticket);
        assert!(!history.is_current(ticket));
    }

    #[test]
    fn test_load_ignores_corrupt_history() {
        let mut storage = MemoryStore::new();
        storage.set(HISTORY_KEY, "[{\"question\":1}]".to_string()).unwrap();

        let history = ConversationStore::load(&storage).unwrap();
        assert!(history.is_empty());
    }
}
