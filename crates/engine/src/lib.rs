//! `rowsift-engine` — Grid substrate and row transformation pipeline.
//!
//! Immutable grid snapshots, the backend-agnostic row-function
//! abstractions (predicate / mapper / aggregator), the facet filter
//! composer, and the operation → change compilation pipeline.

pub mod cell;
pub mod column;
pub mod error;
pub mod facet;
pub mod grid;
pub mod operation;
pub mod ops;
pub mod row;
pub mod rowfn;

pub use cell::{Cell, CellValue};
pub use column::{Column, ColumnModel};
pub use error::EngineError;
pub use facet::EngineConfig;
pub use grid::Grid;
pub use operation::{AnyOperation, Change, ChangeContext, Operation};
pub use row::Row;
pub use rowfn::{RowAggregator, RowMapper, RowPredicate};
