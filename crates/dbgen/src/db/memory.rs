//! In-memory backend for dry runs and tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tracing::debug;

use super::{PersistError, Persistence};
use crate::schema::{Column, ColumnType, Table};
use crate::value::{Record, Value};

/// Keeps committed rows per table in memory.
///
/// Inserts are checked against the table's column types the way a database
/// would check them, and staged until the transaction commits. Failures can be
/// injected with [`MemoryPersistence::fail_on`].
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    committed: BTreeMap<String, Vec<Record>>,
    pending: Option<Vec<(String, Record)>>,
    faults: Vec<(String, usize)>,
    commit_faults: Vec<String>,
    begin_faults: Vec<usize>,
    begins: usize,
    inserted_in_tx: HashMap<String, usize>,
    commits: usize,
    rollbacks: usize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the `row`-th insert (1-based) into `table` within a transaction.
    pub fn fail_on(mut self, table: impl Into<String>, row: usize) -> Self {
        self.faults.push((table.into(), row));
        self
    }

    /// Rejects the commit of any transaction that staged rows for `table`.
    /// The staged rows are discarded.
    pub fn fail_commit_on(mut self, table: impl Into<String>) -> Self {
        self.commit_faults.push(table.into());
        self
    }

    /// Fails the `nth` call to `begin` (1-based) as if no connection were
    /// available.
    pub fn fail_begin_at(mut self, nth: usize) -> Self {
        self.begin_faults.push(nth);
        self
    }

    /// Committed rows of `table`.
    pub fn rows(&self, table: &str) -> &[Record] {
        self.committed
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Committed rows of every table, ordered by table name.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.committed
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }

    pub fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    fn check_record(table: &Table, record: &Record) -> Result<(), PersistError> {
        for (name, value) in record.iter() {
            let column = table
                .column(name)
                .map_err(|_| PersistError::ConstraintViolation {
                    table: table.name().to_string(),
                    column: name.to_string(),
                    reason: "no such column".to_string(),
                })?;
            check_value(column, value)?;
        }

        for column in table.required_columns() {
            if record.get(column.name()).is_none() {
                return Err(PersistError::ConstraintViolation {
                    table: table.name().to_string(),
                    column: column.name().to_string(),
                    reason: "null value violates not-null constraint".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_value(column: &Column, value: &Value) -> Result<(), PersistError> {
    let violation = |reason: String| PersistError::ConstraintViolation {
        table: column.table().to_string(),
        column: column.name().to_string(),
        reason,
    };
    let mismatch = |expected: &'static str| PersistError::TypeMismatch {
        table: column.table().to_string(),
        column: column.name().to_string(),
        expected,
        actual: value.type_name(),
    };

    match (column.ty(), value) {
        (_, Value::Null) if column.is_nullable() => Ok(()),
        (_, Value::Null) => Err(violation(
            "null value violates not-null constraint".to_string(),
        )),
        (ColumnType::Varchar { max_len }, Value::Text(s) | Value::Enum(s)) => {
            if s.chars().count() > *max_len {
                Err(violation(format!("value too long for varchar({max_len})")))
            } else {
                Ok(())
            }
        }
        (ColumnType::Text, Value::Text(_) | Value::Enum(_)) => Ok(()),
        (ColumnType::Enum { max_len, domain }, Value::Enum(s)) => {
            if s.chars().count() > *max_len {
                Err(violation(format!("value too long for varchar({max_len})")))
            } else if !domain.contains(s) {
                Err(violation(format!("{s} is not a valid enumerant")))
            } else {
                Ok(())
            }
        }
        (ColumnType::Enum { .. }, _) => Err(mismatch("enum")),
        (ColumnType::BigInt | ColumnType::BigSerial, Value::Int(_)) => Ok(()),
        (ColumnType::BigInt | ColumnType::BigSerial, _) => Err(mismatch("int")),
        (ColumnType::Varchar { .. } | ColumnType::Text, _) => Err(mismatch("text")),
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn begin(&mut self) -> Result<(), PersistError> {
        if self.pending.is_some() {
            return Err(PersistError::TransactionAlreadyOpen);
        }
        self.begins += 1;
        if self.begin_faults.contains(&self.begins) {
            return Err(PersistError::Database(sqlx::Error::PoolTimedOut));
        }
        self.pending = Some(Vec::new());
        self.inserted_in_tx.clear();
        Ok(())
    }

    async fn insert(&mut self, table: &Table, record: &Record) -> Result<(), PersistError> {
        let pending = self.pending.as_mut().ok_or(PersistError::NoTransaction)?;

        let count = self
            .inserted_in_tx
            .entry(table.name().to_string())
            .or_default();
        *count += 1;
        let count = *count;

        if self
            .faults
            .iter()
            .any(|(name, row)| name == table.name() && *row == count)
        {
            return Err(PersistError::Rejected {
                table: table.name().to_string(),
                reason: format!("injected failure on row {count}"),
            });
        }

        Self::check_record(table, record)?;
        pending.push((table.name().to_string(), record.clone()));
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), PersistError> {
        let pending = self.pending.take().ok_or(PersistError::NoTransaction)?;
        if let Some((table, _)) = pending
            .iter()
            .find(|(table, _)| self.commit_faults.contains(table))
        {
            let table = table.clone();
            debug!("Discarding {} staged rows on failed commit", pending.len());
            self.rollbacks += 1;
            return Err(PersistError::Rejected {
                table,
                reason: "injected failure on commit".to_string(),
            });
        }
        debug!("Committing {} staged rows", pending.len());
        for (table, record) in pending {
            self.committed.entry(table).or_default().push(record);
        }
        self.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), PersistError> {
        let pending = self.pending.take().ok_or(PersistError::NoTransaction)?;
        debug!("Discarding {} staged rows", pending.len());
        self.rollbacks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pets() -> Table {
        Table::new("pets")
            .with_column(Column::new("id", ColumnType::BigSerial))
            .with_column(Column::new("name", ColumnType::Varchar { max_len: 8 }))
            .with_column(Column::new("type", ColumnType::enumeration(25, ["DOG", "CAT"])))
    }

    fn pet(name: &str, kind: &str) -> Record {
        let mut record = Record::new();
        record.set("name", Value::Text(name.to_string()));
        record.set("type", Value::Enum(kind.to_string()));
        record
    }

    #[tokio::test]
    async fn test_rows_visible_after_commit() {
        let table = pets();
        let mut store = MemoryPersistence::new();

        store.begin().await.unwrap();
        store.insert(&table, &pet("Rex", "DOG")).await.unwrap();
        assert!(store.rows("pets").is_empty());
        store.commit().await.unwrap();

        assert_eq!(store.rows("pets").len(), 1);
        assert_eq!(store.commits(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_rows() {
        let table = pets();
        let mut store = MemoryPersistence::new();

        store.begin().await.unwrap();
        store.insert(&table, &pet("Rex", "DOG")).await.unwrap();
        store.rollback().await.unwrap();

        assert!(store.rows("pets").is_empty());
        assert_eq!(store.rollbacks(), 1);
        assert!(!store.in_transaction());
    }

    #[tokio::test]
    async fn test_insert_requires_transaction() {
        let mut store = MemoryPersistence::new();
        let err = store.insert(&pets(), &pet("Rex", "DOG")).await.unwrap_err();
        assert!(matches!(err, PersistError::NoTransaction));
    }

    #[tokio::test]
    async fn test_single_open_transaction() {
        let mut store = MemoryPersistence::new();
        store.begin().await.unwrap();
        assert!(matches!(
            store.begin().await,
            Err(PersistError::TransactionAlreadyOpen)
        ));
    }

    #[tokio::test]
    async fn test_constraints_enforced() {
        let table = pets();
        let mut store = MemoryPersistence::new();
        store.begin().await.unwrap();

        let too_long = store.insert(&table, &pet("Maximilian", "DOG")).await;
        assert!(matches!(
            too_long,
            Err(PersistError::ConstraintViolation { .. })
        ));

        let bad_enum = store.insert(&table, &pet("Rex", "FISH")).await;
        assert!(matches!(
            bad_enum,
            Err(PersistError::ConstraintViolation { .. })
        ));

        let mut missing = Record::new();
        missing.set("name", Value::Text("Rex".into()));
        assert!(store.insert(&table, &missing).await.is_err());

        let mut wrong_type = pet("Rex", "DOG");
        wrong_type.set("name", Value::Int(4));
        assert!(matches!(
            store.insert(&table, &wrong_type).await,
            Err(PersistError::TypeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_enum_length_counts_chars() {
        let table = Table::new("drinks")
            .with_column(Column::new("kind", ColumnType::enumeration(4, ["CAFÉ"])));
        let mut record = Record::new();
        record.set("kind", Value::Enum("CAFÉ".to_string()));

        let mut store = MemoryPersistence::new();
        store.begin().await.unwrap();
        store.insert(&table, &record).await.unwrap();
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let table = pets();
        let mut store = MemoryPersistence::new().fail_on("pets", 2);
        store.begin().await.unwrap();

        assert!(store.insert(&table, &pet("A", "DOG")).await.is_ok());
        assert!(matches!(
            store.insert(&table, &pet("B", "CAT")).await,
            Err(PersistError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_injected_commit_failure_discards_rows() {
        let table = pets();
        let mut store = MemoryPersistence::new().fail_commit_on("pets");
        store.begin().await.unwrap();
        store.insert(&table, &pet("Rex", "DOG")).await.unwrap();

        assert!(matches!(
            store.commit().await,
            Err(PersistError::Rejected { .. })
        ));
        assert!(!store.in_transaction());
        assert!(store.rows("pets").is_empty());
        assert_eq!(store.commits(), 0);
    }

    #[tokio::test]
    async fn test_injected_begin_failure() {
        let mut store = MemoryPersistence::new().fail_begin_at(1);
        assert!(store.begin().await.is_err());
        assert!(!store.in_transaction());
        store.begin().await.unwrap();
        assert!(store.in_transaction());
    }
}
