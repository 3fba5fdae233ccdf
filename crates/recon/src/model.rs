use serde::{Deserialize, Serialize};

use crate::history::HistoryEntryId;
use crate::identity::ReconId;

// ---------------------------------------------------------------------------
// Judgment
// ---------------------------------------------------------------------------

/// Reconciliation state of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    /// Candidates may exist but none has been chosen.
    #[default]
    None,
    /// Linked to an entity that already exists in the catalog.
    Matched,
    /// Marked as an entity that does not exist in the catalog yet.
    New,
}

impl std::fmt::Display for Judgment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Matched => write!(f, "matched"),
            Self::New => write!(f, "new"),
        }
    }
}

/// How a judgment was applied: one cell at a time, or by a batch operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgmentAction {
    Single,
    Mass,
    #[default]
    Unknown,
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A catalog entity proposed for a cell by the reconciliation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconCandidate {
    /// Entity identifier within the catalog's identifier space.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub score: f64,
}

impl ReconCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            types: Vec::new(),
            score: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Recon record
// ---------------------------------------------------------------------------

/// Per-cell reconciliation record.
///
/// Records are immutable values: every "mutation" is a copy with
/// overrides (`dup`, `with_*`). The identity is set once at first
/// creation and threaded through every copy; there is no
/// way to replace it afterwards.
///
/// Invariants:
/// - `judgment == Matched` ⇒ a match candidate is present
/// - `judgment == New` ⇒ no match candidate and no match rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recon {
    id: ReconId,
    judgment: Judgment,
    #[serde(rename = "match")]
    match_candidate: Option<ReconCandidate>,
    match_rank: Option<usize>,
    /// Candidates returned by the service, best first. Informational;
    /// retained across copies.
    #[serde(default)]
    candidates: Vec<ReconCandidate>,
    /// Operation that last set the judgment.
    judgment_history_entry: HistoryEntryId,
    judgment_action: JudgmentAction,
}

impl Recon {
    /// Fresh record in judgment `None`, owned by the given history entry.
    ///
    /// `id` must come from the identity authority: either minted on the
    /// spot or assigned ahead by an aggregation pass.
    pub fn new(id: ReconId, history_entry: HistoryEntryId) -> Self {
        Self {
            id,
            judgment: Judgment::None,
            match_candidate: None,
            match_rank: None,
            candidates: Vec::new(),
            judgment_history_entry: history_entry,
            judgment_action: JudgmentAction::Unknown,
        }
    }

    pub fn id(&self) -> ReconId {
        self.id
    }

    pub fn judgment(&self) -> Judgment {
        self.judgment
    }

    pub fn match_candidate(&self) -> Option<&ReconCandidate> {
        self.match_candidate.as_ref()
    }

    pub fn match_rank(&self) -> Option<usize> {
        self.match_rank
    }

    pub fn candidates(&self) -> &[ReconCandidate] {
        &self.candidates
    }

    pub fn judgment_history_entry(&self) -> HistoryEntryId {
        self.judgment_history_entry
    }

    pub fn judgment_action(&self) -> JudgmentAction {
        self.judgment_action
    }

    /// Copy this record for a new transformation: identity preserved,
    /// provenance re-tagged to the operation now touching it.
    pub fn dup(&self, history_entry: HistoryEntryId) -> Self {
        Self {
            judgment_history_entry: history_entry,
            ..self.clone()
        }
    }

    /// Copy with the judgment replaced. Switching to `New` clears the
    /// match candidate and rank, keeping the record's invariants intact.
    pub fn with_judgment(self, judgment: Judgment) -> Self {
        let (match_candidate, match_rank) = match judgment {
            Judgment::New => (None, None),
            _ => (self.match_candidate, self.match_rank),
        };
        Self {
            judgment,
            match_candidate,
            match_rank,
            ..self
        }
    }

    /// Copy matched to the given candidate: sets the candidate and the
    /// `Matched` judgment together so the invariant holds by construction.
    pub fn with_match(self, candidate: ReconCandidate) -> Self {
        Self {
            judgment: Judgment::Matched,
            match_candidate: Some(candidate),
            ..self
        }
    }

    pub fn with_match_rank(self, rank: Option<usize>) -> Self {
        Self {
            match_rank: rank,
            ..self
        }
    }

    pub fn with_candidates(self, candidates: Vec<ReconCandidate>) -> Self {
        Self { candidates, ..self }
    }

    pub fn with_judgment_action(self, action: JudgmentAction) -> Self {
        Self {
            judgment_action: action,
            ..self
        }
    }

    /// Best entity reference for this record, if any: the match when
    /// judged, otherwise the top candidate.
    pub fn best_candidate(&self) -> Option<&ReconCandidate> {
        self.match_candidate.as_ref().or_else(|| self.candidates.first())
    }
}
