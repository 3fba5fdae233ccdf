use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Stable numeric identity of a recon record.
///
/// Minted once by an [`IdentityAuthority`] and preserved by every later
/// copy of the record; two records sharing an id denote the same logical
/// entity-to-be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReconId(pub u64);

impl std::fmt::Display for ReconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints globally-unique reconciliation identities.
///
/// Every call returns a genuinely new identity; minting is never
/// idempotent, and never derived from partition-local counters, so
/// partitioned aggregation cannot produce colliding ids.
pub trait IdentityAuthority: Send + Sync {
    fn mint(&self) -> ReconId;
}

/// In-process authority backed by an atomic counter.
#[derive(Debug)]
pub struct SequenceAuthority {
    next: AtomicU64,
}

impl SequenceAuthority {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start the sequence at a given id (e.g. resuming a stored project).
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequenceAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityAuthority for SequenceAuthority {
    fn mint(&self) -> ReconId {
        ReconId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
