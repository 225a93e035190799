//! Example: generate two tables into memory and inspect the run report.
//!
//! The `pets` table is set up to fail on its 10th row, so the run shows one
//! committed table and one rolled-back table.
//!
//! Run with:
//! ```
//! cargo run --example dry_run
//! ```

use dbgen::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let owners = Table::new("owners")
        .with_column(Column::new("id", ColumnType::BigSerial))
        .with_column(Column::new("name", ColumnType::Varchar { max_len: 32 }))
        .with_column(Column::new("age", ColumnType::BigInt));

    let pets = Table::new("pets")
        .with_column(Column::new("id", ColumnType::BigSerial))
        .with_column(Column::new("name", ColumnType::Varchar { max_len: 255 }))
        .with_column(Column::new("type", ColumnType::enumeration(25, ["DOG", "CAT"])))
        .with_column(Column::new("nickname", ColumnType::Text).nullable());

    let store = MemoryPersistence::new().fail_on("pets", 10);
    let mut seeder = Seeder::new(store).with_seed(54321).with_progress_interval(5);

    let result = seeder
        .generate(|session| {
            session
                .table(&owners, |t| {
                    t.set_row_count(10)?.set_generators(vec![
                        ColumnBinding::new(
                            owners.column("name")?,
                            NameGenerator::new().with_max_len(32),
                        )?,
                        ColumnBinding::new(owners.column("age")?, IntRangeGenerator::new(18..=90)?)?,
                    ])?;
                    Ok(())
                })?
                .table(&pets, |t| {
                    t.set_row_count(20)?.set_generators(vec![
                        ColumnBinding::new(pets.column("name")?, StringGenerator::new(8..=16)?)?,
                        ColumnBinding::new(
                            pets.column("type")?,
                            EnumGenerator::new(["DOG", "CAT"])?,
                        )?,
                    ])?;
                    Ok(())
                })?;
            Ok(())
        })
        .await;

    let report = match result {
        Ok(report) => report,
        Err(SeedError::TablesFailed(report)) => *report,
        Err(e) => return Err(e.into()),
    };

    for table in &report.tables {
        match &table.outcome {
            TableOutcome::Committed { rows } => {
                tracing::info!("{}: committed {} rows", table.table, rows)
            }
            TableOutcome::RolledBack { failed_row, error } => tracing::info!(
                "{}: rolled back at row {:?}: {}",
                table.table,
                failed_row,
                error
            ),
            TableOutcome::Skipped => tracing::info!("{}: skipped", table.table),
        }
    }

    for row in seeder.store().rows("owners").iter().take(3) {
        tracing::info!("  owner {}", serde_json::to_string(row)?);
    }

    Ok(())
}
