use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rowsift_recon::{
    HistoryEntryId, IdentityAuthority, JudgmentAction, ReconCandidate, ReconColumnConfig,
};

use crate::error::EngineError;
use crate::facet::EngineConfig;
use crate::grid::Grid;
use crate::operation::{Change, ChangeContext, Operation};
use crate::row::Row;
use crate::rowfn::RowMapper;

/// Matches every scoped cell in a column to one given catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconMatchEntityOperation {
    #[serde(default)]
    pub engine: EngineConfig,
    pub column: String,
    pub candidate: ReconCandidate,
}

impl Operation for ReconMatchEntityOperation {
    fn description(&self) -> String {
        format!(
            "Match entity {} ({}) to cells in column {}",
            self.candidate.name, self.candidate.id, self.column
        )
    }

    fn compile(&self, grid: &Grid, ctx: &ChangeContext) -> Result<Change, EngineError> {
        let column = grid.columns().require(&self.column)?;
        let config = grid
            .columns()
            .column(column)
            .and_then(|c| c.recon_config.clone())
            .ok_or_else(|| EngineError::ColumnNotReconciled(self.column.clone()))?;

        let scope = self.engine.compile(grid.columns())?;
        let mapper = MatchMapper {
            column,
            config,
            history_entry: ctx.history_entry,
            authority: Arc::clone(&ctx.authority),
            candidate: self.candidate.clone(),
        };
        Ok(Change::new(Box::new(scope), Box::new(mapper)))
    }
}

struct MatchMapper {
    column: usize,
    config: ReconColumnConfig,
    history_entry: HistoryEntryId,
    authority: Arc<dyn IdentityAuthority>,
    candidate: ReconCandidate,
}

impl RowMapper for MatchMapper {
    fn map(&self, _row_id: u64, row: &Row) -> Row {
        let Some(cell) = row.cell(self.column) else {
            return row.clone();
        };
        let recon = match &cell.recon {
            Some(prev) => prev.dup(self.history_entry),
            None => self.config.new_recon(self.history_entry, &*self.authority),
        }
        .with_match(self.candidate.clone())
        // The entity was picked directly, not from the cell's candidate
        // list, so it carries no rank.
        .with_match_rank(None)
        .with_judgment_action(JudgmentAction::Mass);

        row.with_cell(self.column, cell.with_recon(Some(recon)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::column::{Column, ColumnModel};
    use rowsift_recon::{HistoryIdSource, Judgment, SequenceAuthority};

    fn recon_config() -> ReconColumnConfig {
        ReconColumnConfig::from_toml(
            r#"
service = "https://catalog.example/api"
identifier_space = "http://catalog.example/entity/"
schema_space = "http://catalog.example/prop/"
"#,
        )
        .unwrap()
    }

    #[test]
    fn matches_scoped_cells_to_the_entity() {
        let columns =
            ColumnModel::new(vec![Column::reconciled("city", recon_config())]).unwrap();
        let rows = vec![
            Row::of(vec![Cell::text("Paris")]),
            Row::of(vec![Cell::text("paris")]),
        ];
        let grid = Grid::new(columns, rows);

        let op = ReconMatchEntityOperation {
            engine: EngineConfig::all_rows(),
            column: "city".into(),
            candidate: ReconCandidate::new("Q90", "Paris"),
        };
        let history = HistoryIdSource::new();
        let authority: Arc<dyn IdentityAuthority> = Arc::new(SequenceAuthority::new());
        let (next, _) =
            crate::operation::apply_operation(&grid, &op, &history, &authority).unwrap();

        for row in next.rows() {
            let recon = row.cell(0).unwrap().recon.as_ref().unwrap();
            assert_eq!(recon.judgment(), Judgment::Matched);
            assert_eq!(recon.match_candidate().unwrap().id, "Q90");
            assert_eq!(recon.judgment_action(), JudgmentAction::Mass);
        }
    }

    #[test]
    fn unreconciled_column_fails() {
        let columns = ColumnModel::new(vec![Column::new("city")]).unwrap();
        let grid = Grid::new(columns, vec![Row::of(vec![Cell::text("Paris")])]);

        let op = ReconMatchEntityOperation {
            engine: EngineConfig::all_rows(),
            column: "city".into(),
            candidate: ReconCandidate::new("Q90", "Paris"),
        };
        let history = HistoryIdSource::new();
        let authority: Arc<dyn IdentityAuthority> = Arc::new(SequenceAuthority::new());
        let err =
            crate::operation::apply_operation(&grid, &op, &history, &authority).unwrap_err();
        assert!(matches!(err, EngineError::ColumnNotReconciled(_)));
    }
}
