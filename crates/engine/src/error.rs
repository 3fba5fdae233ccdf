use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Target column absent from the column model.
    ColumnNotFound(String),
    /// Operation requires a reconciled column and the target has no
    /// reconciliation configuration.
    ColumnNotReconciled(String),
    /// Column model construction with two columns of the same name.
    DuplicateColumn(String),
    /// Serialized operation could not be deserialized.
    OperationParse(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(name) => write!(f, "column '{name}' not found"),
            Self::ColumnNotReconciled(name) => write!(f, "column '{name}' is not reconciled"),
            Self::DuplicateColumn(name) => write!(f, "duplicate column name '{name}'"),
            Self::OperationParse(msg) => write!(f, "operation parse error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
