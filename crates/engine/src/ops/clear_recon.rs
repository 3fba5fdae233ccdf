use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::facet::EngineConfig;
use crate::grid::Grid;
use crate::operation::{Change, ChangeContext, Operation};
use crate::row::Row;
use crate::rowfn::RowMapper;

/// Clears reconciliation data from every scoped cell in a column.
///
/// Works on any existing column; removing records needs no
/// reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconClearOperation {
    #[serde(default)]
    pub engine: EngineConfig,
    pub column: String,
}

impl Operation for ReconClearOperation {
    fn description(&self) -> String {
        format!("Clear recon data for cells in column {}", self.column)
    }

    fn compile(&self, grid: &Grid, _ctx: &ChangeContext) -> Result<Change, EngineError> {
        let column = grid.columns().require(&self.column)?;
        let scope = self.engine.compile(grid.columns())?;
        Ok(Change::new(Box::new(scope), Box::new(ClearMapper { column })))
    }
}

struct ClearMapper {
    column: usize,
}

impl RowMapper for ClearMapper {
    fn map(&self, _row_id: u64, row: &Row) -> Row {
        match row.cell(self.column) {
            Some(cell) if cell.recon.is_some() => {
                row.with_cell(self.column, cell.with_recon(None))
            }
            _ => row.clone(),
        }
    }
}
