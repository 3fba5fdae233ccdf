use std::sync::OnceLock;

use rowsift_recon::ReconStats;

use crate::column::ColumnModel;
use crate::row::Row;
use crate::rowfn::{RowAggregator, RowMapper};

/// Immutable snapshot of rows and column metadata.
///
/// Row id is the stable index of the row; transformations that neither
/// add nor remove rows preserve it. Grids are never mutated once
/// published; applying a change produces a new grid, and each new grid
/// starts with an empty statistics cache so dependent stats recompute on
/// demand.
pub struct Grid {
    columns: ColumnModel,
    rows: Vec<Row>,
    stats: Vec<OnceLock<ReconStats>>,
}

impl Grid {
    pub fn new(columns: ColumnModel, rows: Vec<Row>) -> Self {
        let stats = (0..columns.len()).map(|_| OnceLock::new()).collect();
        Self {
            columns,
            rows,
            stats,
        }
    }

    pub fn columns(&self) -> &ColumnModel {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row_id: u64) -> Option<&Row> {
        self.rows.get(row_id as usize)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Apply a mapper to every row, producing a new grid over the same
    /// column model.
    pub fn map_rows<M: RowMapper + ?Sized>(&self, mapper: &M) -> Grid {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(id, row)| mapper.map(id as u64, row))
            .collect();
        Grid::new(self.columns.clone(), rows)
    }

    /// Fold every row into one accumulator, sequentially.
    pub fn aggregate_rows<A, G>(&self, aggregator: &G, initial: A) -> A
    where
        G: RowAggregator<A>,
    {
        self.rows
            .iter()
            .enumerate()
            .fold(initial, |acc, (id, row)| aggregator.fold(acc, id as u64, row))
    }

    /// Fold rows partition by partition, each partition starting from its
    /// own copy of the initial state, then merge the partials.
    ///
    /// Emulates a partitioned backend; for a well-formed aggregator the
    /// result equals `aggregate_rows` for any partition size.
    pub fn aggregate_rows_partitioned<A, G>(
        &self,
        aggregator: &G,
        initial: A,
        partition_rows: usize,
    ) -> A
    where
        A: Clone,
        G: RowAggregator<A>,
    {
        if partition_rows == 0 || partition_rows >= self.rows.len() {
            return self.aggregate_rows(aggregator, initial);
        }

        let partials: Vec<A> = self
            .rows
            .chunks(partition_rows)
            .enumerate()
            .map(|(p, chunk)| {
                let base = p * partition_rows;
                chunk.iter().enumerate().fold(initial.clone(), |acc, (i, row)| {
                    aggregator.fold(acc, (base + i) as u64, row)
                })
            })
            .collect();

        partials
            .into_iter()
            .reduce(|left, right| aggregator.merge(left, right))
            .unwrap_or(initial)
    }

    /// Reconciliation counts for one column, computed on first access and
    /// cached for the lifetime of this snapshot.
    pub fn recon_stats(&self, column: usize) -> Option<ReconStats> {
        let slot = self.stats.get(column)?;
        Some(*slot.get_or_init(|| {
            self.rows.iter().fold(ReconStats::default(), |stats, row| {
                stats.with_record(row.cell(column).and_then(|c| c.recon.as_ref()))
            })
        }))
    }
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        // Fresh cache; stats recompute lazily on the clone.
        Grid::new(self.columns.clone(), self.rows.clone())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .finish()
    }
}
