//! `rowsift-schema` — Export-schema expression evaluator.
//!
//! Resolves column-bound variables to external-entity references by
//! consulting each cell's reconciliation record. Statements that cannot
//! be resolved are skipped individually; the rest of the schema keeps
//! evaluating.

pub mod context;
pub mod entity;
pub mod expr;
pub mod schema;

pub use context::ExpressionContext;
pub use entity::{EntityRef, PlaceholderId};
pub use expr::{EvalInterrupt, EvalResult, ItemExpr, SchemaError};
pub use schema::{EmittedStatement, Schema, Statement};
