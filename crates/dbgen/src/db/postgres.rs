//! PostgreSQL backend.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::debug;

use super::{PersistError, Persistence};
use crate::schema::{ColumnType, Table};
use crate::value::{Record, Value};

/// Stores rows through a sqlx pool, holding one transaction at a time.
pub struct PgPersistence {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Persistence for PgPersistence {
    async fn begin(&mut self) -> Result<(), PersistError> {
        if self.tx.is_some() {
            return Err(PersistError::TransactionAlreadyOpen);
        }
        debug!("BEGIN");
        self.tx = Some(self.pool.begin().await?);
        Ok(())
    }

    async fn insert(&mut self, table: &Table, record: &Record) -> Result<(), PersistError> {
        let tx = self.tx.as_mut().ok_or(PersistError::NoTransaction)?;
        let mut query = insert_query(table, record);
        debug!("{}", query.sql());
        query.build().execute(&mut **tx).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), PersistError> {
        let tx = self.tx.take().ok_or(PersistError::NoTransaction)?;
        debug!("COMMIT");
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), PersistError> {
        let tx = self.tx.take().ok_or(PersistError::NoTransaction)?;
        debug!("ROLLBACK");
        tx.rollback().await?;
        Ok(())
    }
}

/// Quotes an identifier so reserved words like `type` can be used as columns.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Builds `INSERT INTO "t" ("a", "b") VALUES ($1, $2)` for `record`.
fn insert_query<'a>(table: &Table, record: &'a Record) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new(format!("INSERT INTO {}", quote_ident(table.name())));

    if record.is_empty() {
        query.push(" DEFAULT VALUES");
        return query;
    }

    let columns: Vec<String> = record.iter().map(|(c, _)| quote_ident(c)).collect();
    query.push(format!(" ({}) VALUES (", columns.join(", ")));

    let mut values = query.separated(", ");
    for (name, value) in record.iter() {
        match value {
            Value::Text(s) | Value::Enum(s) => values.push_bind(s.as_str()),
            Value::Int(n) => values.push_bind(*n),
            // NULL parameters still carry a type, so match the column's
            Value::Null => match table.column(name).map(|c| c.ty()) {
                Ok(ColumnType::BigInt | ColumnType::BigSerial) => values.push_bind(None::<i64>),
                _ => values.push_bind(None::<String>),
            },
        };
    }
    query.push(")");
    query
}
