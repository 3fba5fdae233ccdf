//! Operation → change compilation.
//!
//! An operation is a declarative, serializable description. Compiling it
//! against a grid and an execution context produces a [`Change`]: a row
//! mapper gated by the scope predicate, applied to every row (selected
//! rows transformed, unselected rows identity-copied). Compilation
//! failures abort before any row is touched, leaving the prior grid
//! valid.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rowsift_recon::{HistoryEntry, HistoryEntryId, HistoryIdSource, IdentityAuthority};

use crate::error::EngineError;
use crate::grid::Grid;
use crate::ops::{ReconClearOperation, ReconMarkNewOperation, ReconMatchEntityOperation};
use crate::row::Row;
use crate::rowfn::{RowMapper, RowPredicate};

/// Execution context for one operation application: the history-entry id
/// minted for it, and the identity-generation authority.
#[derive(Clone)]
pub struct ChangeContext {
    pub history_entry: HistoryEntryId,
    pub authority: Arc<dyn IdentityAuthority>,
}

impl ChangeContext {
    pub fn new(history_entry: HistoryEntryId, authority: Arc<dyn IdentityAuthority>) -> Self {
        Self {
            history_entry,
            authority,
        }
    }
}

/// A compiled operation, ready to apply.
pub struct Change {
    scope: Box<dyn RowPredicate>,
    mapper: Box<dyn RowMapper>,
}

impl Change {
    pub fn new(scope: Box<dyn RowPredicate>, mapper: Box<dyn RowMapper>) -> Self {
        Self { scope, mapper }
    }

    /// Produce the new grid: rows inside the scope run through the
    /// mapper, rows outside pass through unchanged.
    pub fn apply(&self, grid: &Grid) -> Grid {
        grid.map_rows(&Gated {
            scope: &*self.scope,
            mapper: &*self.mapper,
        })
    }
}

struct Gated<'a> {
    scope: &'a dyn RowPredicate,
    mapper: &'a dyn RowMapper,
}

impl RowMapper for Gated<'_> {
    fn map(&self, row_id: u64, row: &Row) -> Row {
        if self.scope.test(row_id, row) {
            self.mapper.map(row_id, row)
        } else {
            row.clone()
        }
    }
}

/// A declarative, serializable row transformation.
pub trait Operation {
    /// Human-readable description, recorded on the history entry.
    fn description(&self) -> String;

    /// Compile against a grid. All validation happens here; a returned
    /// error means no row was read or written.
    fn compile(&self, grid: &Grid, ctx: &ChangeContext) -> Result<Change, EngineError>;
}

/// The serialized form of every operation this engine ships.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AnyOperation {
    ReconMarkNew(ReconMarkNewOperation),
    ReconMatchEntity(ReconMatchEntityOperation),
    ReconClear(ReconClearOperation),
}

impl AnyOperation {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::OperationParse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|e| EngineError::OperationParse(e.to_string()))
    }
}

impl Operation for AnyOperation {
    fn description(&self) -> String {
        match self {
            Self::ReconMarkNew(op) => op.description(),
            Self::ReconMatchEntity(op) => op.description(),
            Self::ReconClear(op) => op.description(),
        }
    }

    fn compile(&self, grid: &Grid, ctx: &ChangeContext) -> Result<Change, EngineError> {
        match self {
            Self::ReconMarkNew(op) => op.compile(grid, ctx),
            Self::ReconMatchEntity(op) => op.compile(grid, ctx),
            Self::ReconClear(op) => op.compile(grid, ctx),
        }
    }
}

/// Compile and apply one operation, minting its history entry.
///
/// Compilation failures surface before any row is touched; the prior
/// grid stays valid either way.
pub fn apply_operation(
    grid: &Grid,
    operation: &dyn Operation,
    history: &HistoryIdSource,
    authority: &Arc<dyn IdentityAuthority>,
) -> Result<(Grid, HistoryEntry), EngineError> {
    let entry = history.begin(operation.description());
    let ctx = ChangeContext::new(entry.id, Arc::clone(authority));
    let change = operation.compile(grid, &ctx)?;
    Ok((change.apply(grid), entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::rowfn::{FnMapper, FnPredicate};

    #[test]
    fn change_identity_copies_unselected_rows() {
        use crate::column::{Column, ColumnModel};

        let columns = ColumnModel::new(vec![Column::new("city")]).unwrap();
        let rows = vec![
            Row::of(vec![Cell::text("a")]),
            Row::of(vec![Cell::text("b")]),
        ];
        let grid = Grid::new(columns, rows);

        let change = Change::new(
            Box::new(FnPredicate(|id, _: &Row| id == 0)),
            Box::new(FnMapper(|_, row: &Row| row.with_cell(0, Cell::text("mapped")))),
        );
        let next = change.apply(&grid);

        assert_eq!(next.row(0).unwrap().cell(0).unwrap().value.to_display(), "mapped");
        assert_eq!(next.row(1).unwrap().cell(0).unwrap().value.to_display(), "b");
    }
}
