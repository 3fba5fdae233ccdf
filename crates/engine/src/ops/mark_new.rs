use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use rowsift_recon::{
    HistoryEntryId, IdentityAuthority, Judgment, JudgmentAction, ReconColumnConfig, ReconId,
};

use crate::error::EngineError;
use crate::facet::EngineConfig;
use crate::grid::Grid;
use crate::operation::{Change, ChangeContext, Operation};
use crate::row::Row;
use crate::rowfn::{RowAggregator, RowMapper, RowPredicate};

/// Marks every scoped cell in a column as reconciled to a new entity.
///
/// With `share_new_entities`, rows carrying the identical cell value are
/// assigned one shared freshly-minted identity; otherwise each cell gets
/// its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconMarkNewOperation {
    #[serde(default)]
    pub engine: EngineConfig,
    pub column: String,
    #[serde(default)]
    pub share_new_entities: bool,
}

impl Operation for ReconMarkNewOperation {
    fn description(&self) -> String {
        format!(
            "Mark to create new entities for cells in column {}, {}",
            self.column,
            if self.share_new_entities {
                "one entity for each group of identical cells"
            } else {
                "one entity for each cell"
            }
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

        let mapper: Box<dyn RowMapper> = if self.share_new_entities {
            let aggregator = ValueDedupAggregator::new(column, &scope, &*ctx.authority);
            let value_to_id = grid.aggregate_rows(&aggregator, ValueIdMap::default());
            Box::new(SharingMapper {
                column,
                config,
                history_entry: ctx.history_entry,
                authority: Arc::clone(&ctx.authority),
                value_to_id,
            })
        } else {
            Box::new(DistinctMapper {
                column,
                config,
                history_entry: ctx.history_entry,
                authority: Arc::clone(&ctx.authority),
            })
        };

        Ok(Change::new(Box::new(scope), mapper))
    }
}

// ---------------------------------------------------------------------------
// Value deduplication
// ---------------------------------------------------------------------------

/// Accumulator mapping a cell's string form to the identity assigned to
/// it. Built once per operation application, read-only afterward.
pub type ValueIdMap = FxHashMap<String, ReconId>;

/// Assigns one freshly minted identity to each distinct cell value among
/// the scoped rows. First writer wins per value; identities come solely
/// from the central authority, so partitions can never collide.
pub struct ValueDedupAggregator<'a> {
    column: usize,
    scope: &'a dyn RowPredicate,
    authority: &'a dyn IdentityAuthority,
}

impl<'a> ValueDedupAggregator<'a> {
    pub fn new(
        column: usize,
        scope: &'a dyn RowPredicate,
        authority: &'a dyn IdentityAuthority,
    ) -> Self {
        Self {
            column,
            scope,
            authority,
        }
    }
}

impl RowAggregator<ValueIdMap> for ValueDedupAggregator<'_> {
    fn fold(&self, mut acc: ValueIdMap, row_id: u64, row: &Row) -> ValueIdMap {
        if !self.scope.test(row_id, row) {
            return acc;
        }
        let Some(cell) = row.cell(self.column) else {
            return acc;
        };
        if cell.value.is_empty() {
            return acc;
        }
        acc.entry(cell.value.to_display())
            .or_insert_with(|| self.authority.mint());
        acc
    }

    fn merge(&self, mut left: ValueIdMap, right: ValueIdMap) -> ValueIdMap {
        // A key present in one side is adopted unchanged; on conflict the
        // left id stays and the other mint is discarded.
        for (value, id) in right {
            left.entry(value).or_insert(id);
        }
        left
    }
}

// ---------------------------------------------------------------------------
// Mappers
// ---------------------------------------------------------------------------

struct SharingMapper {
    column: usize,
    config: ReconColumnConfig,
    history_entry: HistoryEntryId,
    authority: Arc<dyn IdentityAuthority>,
    value_to_id: ValueIdMap,
}

impl RowMapper for SharingMapper {
    fn map(&self, _row_id: u64, row: &Row) -> Row {
        let Some(cell) = row.cell(self.column) else {
            return row.clone();
        };
        let recon = match self.value_to_id.get(&cell.value.to_display()) {
            Some(id) => self.config.recon_with_id(*id, self.history_entry),
            // Empty values never enter the map; they still get their own
            // fresh identity.
            None => self.config.new_recon(self.history_entry, &*self.authority),
        }
        .with_judgment(Judgment::New)
        .with_judgment_action(JudgmentAction::Mass);

        row.with_cell(self.column, cell.with_recon(Some(recon)))
    }
}

struct DistinctMapper {
    column: usize,
    config: ReconColumnConfig,
    history_entry: HistoryEntryId,
    authority: Arc<dyn IdentityAuthority>,
}

impl RowMapper for DistinctMapper {
    fn map(&self, _row_id: u64, row: &Row) -> Row {
        let Some(cell) = row.cell(self.column) else {
            return row.clone();
        };
        // Re-judging an already reconciled cell keeps its identity; the
        // judgment switch to New clears the match and rank.
        let recon = match &cell.recon {
            Some(prev) => prev.dup(self.history_entry),
            None => self.config.new_recon(self.history_entry, &*self.authority),
        }
        .with_judgment(Judgment::New)
        .with_judgment_action(JudgmentAction::Mass);

        row.with_cell(self.column, cell.with_recon(Some(recon)))
    }
}
