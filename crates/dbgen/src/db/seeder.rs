//! Execution of generation sessions.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{info, warn};

use super::{PersistError, Persistence};
use crate::builders::{GenerationSession, TableEntry};
use crate::config::{FailurePolicy, SeedConfig};
use crate::errors::{ConfigStateError, DeclarationError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    #[error(transparent)]
    ConfigState(#[from] ConfigStateError),
    #[error("{} of {} tables failed", .0.failed_count(), .0.tables.len())]
    TablesFailed(Box<RunReport>),
}

/// How one table's transactional scope ended.
#[derive(Debug)]
pub enum TableOutcome {
    /// Every row was inserted and committed.
    Committed { rows: usize },
    /// Nothing was committed. `failed_row` is the 1-based row whose insert
    /// failed, or `None` when the transaction itself could not be opened or
    /// committed.
    RolledBack {
        failed_row: Option<usize>,
        error: PersistError,
    },
    /// Not attempted because an earlier table failed under
    /// [`FailurePolicy::StopOnFirst`].
    Skipped,
}

impl TableOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }

    pub fn committed_rows(&self) -> usize {
        match self {
            Self::Committed { rows } => *rows,
            _ => 0,
        }
    }
}

#[derive(Debug)]
pub struct TableReport {
    pub table: String,
    pub requested_rows: usize,
    pub outcome: TableOutcome,
    pub elapsed_ms: u64,
}

/// Result of running a session, one report per declared table in order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub tables: Vec<TableReport>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = &TableReport> {
        self.tables.iter().filter(|t| t.outcome.is_failure())
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.outcome.committed_rows()).sum()
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }
}

/// Runs generation sessions against a persistence backend.
///
/// Tables are seeded in declaration order, each inside its own transaction.
/// A failing insert rolls back that table only.
pub struct Seeder<P> {
    store: P,
    rng: StdRng,
    policy: FailurePolicy,
    progress_interval: usize,
}

impl<P: Persistence> Seeder<P> {
    /// Creates a new seeder with an entropy-seeded RNG.
    pub fn new(store: P) -> Self {
        Self {
            store,
            rng: StdRng::from_entropy(),
            policy: FailurePolicy::default(),
            progress_interval: 50,
        }
    }

    /// Creates a seeder configured from `config`.
    pub fn from_config(store: P, config: &SeedConfig) -> Self {
        let seeder = Self::new(store)
            .with_policy(config.failure_policy)
            .with_progress_interval(config.progress_interval);
        match config.seed {
            Some(seed) => seeder.with_seed(seed),
            None => seeder,
        }
    }

    /// Seeds the RNG for reproducible data.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets how many rows pass between progress log lines.
    pub fn with_progress_interval(mut self, rows: usize) -> Self {
        self.progress_interval = rows.max(1);
        self
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn into_store(self) -> P {
        self.store
    }

    /// Builds a session with `build` and runs it.
    pub async fn generate<F>(&mut self, build: F) -> Result<RunReport, SeedError>
    where
        F: FnOnce(&mut GenerationSession) -> Result<(), DeclarationError>,
    {
        let session = GenerationSession::build(build)?;
        self.run(session).await
    }

    /// Seeds every table declared in `session`.
    ///
    /// The session is validated before anything is written. Returns
    /// [`SeedError::TablesFailed`] with the full report if any table was
    /// rolled back.
    pub async fn run(&mut self, session: GenerationSession) -> Result<RunReport, SeedError> {
        session.validate()?;

        let start = Instant::now();
        let mut report = RunReport::default();
        let mut stopped = false;

        info!("Seeding {} tables...", session.len());

        for entry in session.into_entries() {
            let table_start = Instant::now();

            let outcome = if stopped {
                info!("Skipping {} after earlier failure", entry.table().name());
                TableOutcome::Skipped
            } else {
                self.seed_table(&entry).await?
            };

            if outcome.is_failure() && self.policy == FailurePolicy::StopOnFirst {
                stopped = true;
            }

            report.tables.push(TableReport {
                table: entry.table().name().to_string(),
                requested_rows: entry.rows(),
                outcome,
                elapsed_ms: table_start.elapsed().as_millis() as u64,
            });
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;

        if !report.is_success() {
            for failed in report.failed() {
                warn!("Table {} was not seeded", failed.table);
            }
            return Err(SeedError::TablesFailed(Box::new(report)));
        }

        info!(
            "Seeded {} rows across {} tables",
            report.total_rows(),
            report.tables.len()
        );
        Ok(report)
    }

    /// Inserts all rows of one table inside a single transaction.
    ///
    /// Persistence failures end up in the returned outcome. The outer error is
    /// only for an entry whose generators were never set.
    async fn seed_table(&mut self, entry: &TableEntry) -> Result<TableOutcome, ConfigStateError> {
        let table = entry.table();
        let rows = entry.rows();
        info!("Seeding {} rows into {}...", rows, table.name());

        if let Err(error) = self.store.begin().await {
            warn!("Could not open transaction for {}: {error}", table.name());
            return Ok(TableOutcome::RolledBack {
                failed_row: None,
                error,
            });
        }

        for row in 1..=rows {
            let record = match entry.build_record(&mut self.rng) {
                Ok(record) => record,
                Err(error) => {
                    if let Err(rollback_error) = self.store.rollback().await {
                        warn!("Rollback of {} failed: {rollback_error}", table.name());
                    }
                    return Err(error);
                }
            };

            if let Err(error) = self.store.insert(table, &record).await {
                warn!(
                    "Row {row}/{rows} of {} failed, rolling back: {error}",
                    table.name()
                );
                if let Err(rollback_error) = self.store.rollback().await {
                    warn!("Rollback of {} failed: {rollback_error}", table.name());
                }
                return Ok(TableOutcome::RolledBack {
                    failed_row: Some(row),
                    error,
                });
            }

            if row % self.progress_interval == 0 {
                info!("  Seeded {}/{} rows into {}", row, rows, table.name());
            }
        }

        if let Err(error) = self.store.commit().await {
            warn!("Commit of {} failed: {error}", table.name());
            return Ok(TableOutcome::RolledBack {
                failed_row: None,
                error,
            });
        }

        info!("Seeded {} rows into {}", rows, table.name());
        Ok(TableOutcome::Committed { rows })
    }
}
