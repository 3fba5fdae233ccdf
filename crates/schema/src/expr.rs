use std::fmt;

use serde::{Deserialize, Serialize};

use rowsift_recon::Judgment;

use crate::context::ExpressionContext;
use crate::entity::EntityRef;

#[derive(Debug)]
pub enum SchemaError {
    /// An expression names a column absent from the column model.
    ColumnNotFound(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(name) => write!(f, "column '{name}' not found"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Why evaluation of one output statement stopped.
///
/// `Skip` is expected control flow, not an error: it aborts only the
/// current statement and must never be conflated with `Fatal`.
#[derive(Debug)]
pub enum EvalInterrupt {
    Skip,
    Fatal(SchemaError),
}

pub type EvalResult<T> = Result<T, EvalInterrupt>;

/// Expression resolving to a catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemExpr {
    /// Entity bound to a reconciled cell in the named column.
    Variable { column: String },
    /// Fixed catalog entity, independent of the row.
    Constant { id: String, label: String },
}

impl ItemExpr {
    /// Pure function of the row and context; invoked once per statement
    /// referencing it, any number of times for the same row.
    pub fn evaluate(&self, ctxt: &mut ExpressionContext) -> EvalResult<EntityRef> {
        match self {
            Self::Constant { id, .. } => {
                Ok(EntityRef::existing(id.clone(), ctxt.base_iri().to_string()))
            }
            Self::Variable { column } => {
                let index = ctxt.column_index(column).map_err(EvalInterrupt::Fatal)?;
                let Some(cell) = ctxt.row().cell(index) else {
                    return Err(EvalInterrupt::Skip);
                };
                let Some(recon) = &cell.recon else {
                    return Err(EvalInterrupt::Skip);
                };
                match recon.judgment() {
                    Judgment::Matched => match recon.match_candidate() {
                        Some(candidate) => Ok(EntityRef::existing(
                            candidate.id.clone(),
                            ctxt.base_iri().to_string(),
                        )),
                        None => Err(EvalInterrupt::Skip),
                    },
                    Judgment::New => {
                        let label = cell.value.to_display();
                        Ok(EntityRef::Placeholder(ctxt.placeholder(index, label)))
                    }
                    Judgment::None => Err(EvalInterrupt::Skip),
                }
            }
        }
    }
}
