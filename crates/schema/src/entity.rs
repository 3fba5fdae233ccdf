use std::hash::{Hash, Hasher};

/// Synthesized stand-in for an entity that does not exist in the catalog
/// yet.
///
/// Identity is `(row, column, base_iri)`: two references to the same
/// reconciled cell within one evaluation compare equal. The label is the
/// cell's raw value stringified, carried for display only and excluded
/// from equality and hashing.
#[derive(Debug, Clone, Eq)]
pub struct PlaceholderId {
    pub row: u64,
    pub column: usize,
    pub base_iri: String,
    pub label: String,
}

impl PartialEq for PlaceholderId {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.column == other.column && self.base_iri == other.base_iri
    }
}

impl Hash for PlaceholderId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row.hash(state);
        self.column.hash(state);
        self.base_iri.hash(state);
    }
}

/// Reference to a catalog entity emitted by schema evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRef {
    /// An entity that already exists in the catalog's identifier space.
    Existing { id: String, base_iri: String },
    /// A placeholder for an entity to be created on export.
    Placeholder(PlaceholderId),
}

impl EntityRef {
    pub fn existing(id: impl Into<String>, base_iri: impl Into<String>) -> Self {
        Self::Existing {
            id: id.into(),
            base_iri: base_iri.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// Full IRI for existing entities; placeholders have none yet.
    pub fn iri(&self) -> Option<String> {
        match self {
            Self::Existing { id, base_iri } => Some(format!("{base_iri}{id}")),
            Self::Placeholder(_) => None,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Existing { id, base_iri } => write!(f, "{base_iri}{id}"),
            Self::Placeholder(p) => write!(f, "new:{}:{} ({})", p.row, p.column, p.label),
        }
    }
}
