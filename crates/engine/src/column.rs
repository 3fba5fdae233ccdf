use rustc_hash::FxHashMap;

use rowsift_recon::ReconColumnConfig;

use crate::error::EngineError;

/// One column descriptor: a name, plus the reconciliation configuration
/// if the column has been reconciled against a catalog service.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub recon_config: Option<ReconColumnConfig>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recon_config: None,
        }
    }

    pub fn reconciled(name: impl Into<String>, config: ReconColumnConfig) -> Self {
        Self {
            name: name.into(),
            recon_config: Some(config),
        }
    }
}

/// Ordered column descriptors with unambiguous name lookup.
///
/// Duplicate names are rejected at construction, so `index_of` can never
/// be ambiguous.
#[derive(Debug, Clone)]
pub struct ColumnModel {
    columns: Vec<Column>,
    by_name: FxHashMap<String, usize>,
}

impl ColumnModel {
    pub fn new(columns: Vec<Column>) -> Result<Self, EngineError> {
        let mut by_name = FxHashMap::default();
        for (index, column) in columns.iter().enumerate() {
            if by_name.insert(column.name.clone(), index).is_some() {
                return Err(EngineError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns, by_name })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Resolve a name or fail the way operation compilation reports it.
    pub fn require(&self, name: &str) -> Result<usize, EngineError> {
        self.index_of(name)
            .ok_or_else(|| EngineError::ColumnNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let model =
            ColumnModel::new(vec![Column::new("city"), Column::new("country")]).unwrap();
        assert_eq!(model.index_of("country"), Some(1));
        assert_eq!(model.index_of("region"), None);
        assert!(model.require("region").is_err());
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = ColumnModel::new(vec![Column::new("city"), Column::new("city")]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateColumn(name) if name == "city"));
    }
}
