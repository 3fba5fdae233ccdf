use rustc_hash::FxHashMap;

use rowsift_engine::{Cell, ColumnModel, Row};

use crate::entity::PlaceholderId;
use crate::expr::SchemaError;

/// Evaluation context bound to one row.
///
/// Provides cell lookup by column name, the row's ordinal position, the
/// base namespace IRI, and the per-evaluation scratch registry of
/// synthesized placeholder identities. The registry is scoped to this
/// context (one row's evaluation) and is the only mutable state the
/// evaluator touches.
pub struct ExpressionContext<'a> {
    row_id: u64,
    row: &'a Row,
    columns: &'a ColumnModel,
    base_iri: &'a str,
    placeholders: FxHashMap<(u64, usize), PlaceholderId>,
}

impl<'a> ExpressionContext<'a> {
    pub fn new(row_id: u64, row: &'a Row, columns: &'a ColumnModel, base_iri: &'a str) -> Self {
        Self {
            row_id,
            row,
            columns,
            base_iri,
            placeholders: FxHashMap::default(),
        }
    }

    pub fn row_id(&self) -> u64 {
        self.row_id
    }

    pub fn row(&self) -> &'a Row {
        self.row
    }

    pub fn base_iri(&self) -> &'a str {
        self.base_iri
    }

    pub fn column_index(&self, name: &str) -> Result<usize, SchemaError> {
        self.columns
            .index_of(name)
            .ok_or_else(|| SchemaError::ColumnNotFound(name.to_string()))
    }

    pub fn cell_by_name(&self, name: &str) -> Result<Option<&'a Cell>, SchemaError> {
        Ok(self.row.cell(self.column_index(name)?))
    }

    /// Placeholder identity for a New cell, synthesized once per
    /// (row, column) within this evaluation and reused by every later
    /// reference to the same cell.
    pub fn placeholder(&mut self, column: usize, label: String) -> PlaceholderId {
        self.placeholders
            .entry((self.row_id, column))
            .or_insert_with(|| PlaceholderId {
                row: self.row_id,
                column,
                base_iri: self.base_iri.to_string(),
                label,
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsift_engine::Column;

    #[test]
    fn placeholder_registry_reuses_identity() {
        let columns = ColumnModel::new(vec![Column::new("city")]).unwrap();
        let row = Row::of(vec![Cell::text("Paris")]);
        let mut ctxt = ExpressionContext::new(5, &row, &columns, "http://catalog.example/entity/");

        let first = ctxt.placeholder(0, "Paris".into());
        let second = ctxt.placeholder(0, "Paris".into());
        assert_eq!(first, second);
        assert_eq!(first.label, "Paris");
    }

    #[test]
    fn unknown_column_is_fatal() {
        let columns = ColumnModel::new(vec![Column::new("city")]).unwrap();
        let row = Row::of(vec![Cell::text("Paris")]);
        let ctxt = ExpressionContext::new(0, &row, &columns, "http://catalog.example/entity/");

        assert!(matches!(
            ctxt.column_index("region"),
            Err(SchemaError::ColumnNotFound(_))
        ));
    }
}
