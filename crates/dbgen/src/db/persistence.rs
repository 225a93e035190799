//! The narrow interface the seeder uses to store rows.

use async_trait::async_trait;
use thiserror::Error;

use crate::schema::Table;
use crate::value::Record;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No transaction is open")]
    NoTransaction,

    #[error("A transaction is already open")]
    TransactionAlreadyOpen,

    #[error("Type mismatch for {table}.{column}: expected {expected}, got {actual}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Constraint violation on {table}.{column}: {reason}")]
    ConstraintViolation {
        table: String,
        column: String,
        reason: String,
    },

    #[error("Insert into {table} rejected: {reason}")]
    Rejected { table: String, reason: String },
}

/// Transactional row sink.
///
/// At most one transaction is open at a time. Every `insert` happens inside a
/// transaction started by `begin` and ended by `commit` or `rollback`.
#[async_trait]
pub trait Persistence: Send {
    async fn begin(&mut self) -> Result<(), PersistError>;

    /// Inserts one record as a row of `table`.
    async fn insert(&mut self, table: &Table, record: &Record) -> Result<(), PersistError>;

    async fn commit(&mut self) -> Result<(), PersistError>;

    async fn rollback(&mut self) -> Result<(), PersistError>;
}
