use serde::{Deserialize, Serialize};

use crate::model::{Judgment, Recon};

/// Reconciliation counts over one column.
///
/// Folded cell-by-cell and mergeable across partitions, so a grid can
/// compute them lazily under any execution backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconStats {
    /// Cells carrying a recon record.
    pub non_blank: usize,
    /// Records judged `New`.
    pub new_entities: usize,
    /// Records judged `Matched`.
    pub matched: usize,
}

impl ReconStats {
    /// Fold one cell's record into the counts.
    pub fn with_record(mut self, recon: Option<&Recon>) -> Self {
        if let Some(recon) = recon {
            self.non_blank += 1;
            match recon.judgment() {
                Judgment::New => self.new_entities += 1,
                Judgment::Matched => self.matched += 1,
                Judgment::None => {}
            }
        }
        self
    }

    /// Combine partial counts from independently processed partitions.
    pub fn merge(self, other: Self) -> Self {
        Self {
            non_blank: self.non_blank + other.non_blank,
            new_entities: self.new_entities + other.new_entities,
            matched: self.matched + other.matched,
        }
    }
}
