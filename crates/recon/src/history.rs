use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monotonic token identifying one applied operation.
///
/// Every recon record an operation touches is stamped with the entry id,
/// so "everything this operation changed" can be recovered later without
/// a separate diff log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntryId(pub u64);

impl std::fmt::Display for HistoryEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One applied operation in a project's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub description: String,
    pub committed_at: DateTime<Utc>,
}

/// Monotonic source of history-entry ids, one per applied operation.
#[derive(Debug)]
pub struct HistoryIdSource {
    next: AtomicU64,
}

impl HistoryIdSource {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next_id(&self) -> HistoryEntryId {
        HistoryEntryId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Mint an id and stamp a timestamped entry for an operation about to
    /// be applied.
    pub fn begin(&self, description: impl Into<String>) -> HistoryEntry {
        HistoryEntry {
            id: self.next_id(),
            description: description.into(),
            committed_at: Utc::now(),
        }
    }
}

impl Default for HistoryIdSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_per_entry() {
        let source = HistoryIdSource::new();
        let first = source.begin("mark new");
        let second = source.begin("clear recon");
        assert!(first.id < second.id);
        assert_eq!(first.description, "mark new");
    }
}
