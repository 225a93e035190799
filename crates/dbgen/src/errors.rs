use thiserror::Error;

/// Errors raised while declaring generators, bindings and table plans.
///
/// All of these are detected before the persistence layer is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("Invalid length range: min {min} is greater than max {max}")]
    InvertedLengthRange { min: usize, max: usize },

    #[error("Invalid integer range: min {min} is greater than max {max}")]
    InvertedIntRange { min: i64, max: i64 },

    #[error("Null percentage {percent} is above 100")]
    NullPercentOutOfRange { percent: u8 },

    #[error("Enumerant generator needs at least one value")]
    EmptyEnumerantSet,

    #[error("Row count for table {table} must be positive")]
    ZeroRowCount { table: String },

    #[error("Generators for table {table} were already set")]
    GeneratorsAlreadySet { table: String },

    #[error("Column {table}.{column} does not belong to table {expected}")]
    ForeignColumn {
        expected: String,
        table: String,
        column: String,
    },

    #[error("Column {table}.{column} is bound more than once")]
    DuplicateBinding { table: String, column: String },

    #[error("Required column {table}.{column} has no generator")]
    UnboundRequiredColumn { table: String, column: String },

    #[error("Unknown column {table}.{column}")]
    UnknownColumn { table: String, column: String },

    #[error("Generator {generator} cannot fill {column_type} column {table}.{column}: {reason}")]
    IncompatibleColumn {
        generator: &'static str,
        column_type: &'static str,
        table: String,
        column: String,
        reason: String,
    },
}

/// Reading a required table plan field before it was set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigStateError {
    #[error("Generators for table {table} were never set")]
    GeneratorsUnset { table: String },
}
