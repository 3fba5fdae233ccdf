use serde::{Deserialize, Serialize};

use rowsift_engine::{ColumnModel, Grid, Row};

use crate::context::ExpressionContext;
use crate::entity::EntityRef;
use crate::expr::{EvalInterrupt, EvalResult, ItemExpr, SchemaError};

/// One declarative output statement: subject, property, value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub subject: ItemExpr,
    pub property: String,
    pub value: ItemExpr,
}

/// A statement with both sides resolved to entity references.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedStatement {
    pub subject: EntityRef,
    pub property: String,
    pub value: EntityRef,
}

/// Declarative export schema, evaluated row by row against reconciled
/// cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Base IRI of the target identifier space.
    pub base_iri: String,
    pub statements: Vec<Statement>,
}

impl Schema {
    /// Evaluate every statement against one row.
    ///
    /// A statement whose expressions raise a skip is omitted; the
    /// remaining statements keep evaluating with the same context, so
    /// placeholders synthesized for New cells are shared across the
    /// row's statements. Fatal errors abort the row.
    pub fn evaluate_row(
        &self,
        columns: &ColumnModel,
        row_id: u64,
        row: &Row,
    ) -> Result<Vec<EmittedStatement>, SchemaError> {
        let mut ctxt = ExpressionContext::new(row_id, row, columns, &self.base_iri);
        let mut emitted = Vec::new();
        for statement in &self.statements {
            match evaluate_statement(statement, &mut ctxt) {
                Ok(resolved) => emitted.push(resolved),
                Err(EvalInterrupt::Skip) => continue,
                Err(EvalInterrupt::Fatal(err)) => return Err(err),
            }
        }
        Ok(emitted)
    }

    /// Evaluate the schema over every row of a grid.
    pub fn evaluate_grid(&self, grid: &Grid) -> Result<Vec<Vec<EmittedStatement>>, SchemaError> {
        grid.rows()
            .iter()
            .enumerate()
            .map(|(id, row)| self.evaluate_row(grid.columns(), id as u64, row))
            .collect()
    }
}

fn evaluate_statement(
    statement: &Statement,
    ctxt: &mut ExpressionContext,
) -> EvalResult<EmittedStatement> {
    let subject = statement.subject.evaluate(ctxt)?;
    let value = statement.value.evaluate(ctxt)?;
    Ok(EmittedStatement {
        subject,
        property: statement.property.clone(),
        value,
    })
}
