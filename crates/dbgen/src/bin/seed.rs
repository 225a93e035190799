//! Seeds the demo `pets` table.
//!
//! Run with:
//! ```
//! cargo run -p dbgen --bin seed
//! ```
//!
//! Set `DBGEN_DRY_RUN=1` to generate into memory and print the rows as JSON
//! lines instead of touching the database.

use dbgen::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

const PET_TYPES: [&str; 2] = ["DOG", "CAT"];

fn pets_table() -> Table {
    Table::new("pets")
        .with_column(Column::new("id", ColumnType::BigSerial))
        .with_column(Column::new("name", ColumnType::Varchar { max_len: 255 }))
        .with_column(Column::new("type", ColumnType::enumeration(25, PET_TYPES)))
}

fn declare_pets(session: &mut GenerationSession, pets: &Table) -> Result<(), DeclarationError> {
    session.table(pets, |t| {
        t.set_row_count(25)?.set_generators(vec![
            ColumnBinding::new(pets.column("name")?, StringGenerator::new(16..=64)?)?,
            ColumnBinding::new(pets.column("type")?, EnumGenerator::new(PET_TYPES)?)?,
        ])?;
        Ok(())
    })?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from_env()?;
    let pets = pets_table();
    let session = GenerationSession::build(|s| declare_pets(s, &pets))?;

    // One sample per generator before anything is written
    let mut preview_rng = StdRng::from_entropy();
    for binding in session.entries().iter().flat_map(|e| e.generators().unwrap_or(&[])) {
        tracing::info!(
            "Sample {} ({}): {:?}",
            binding.column().name(),
            binding.generator_kind(),
            binding.sample(&mut preview_rng)
        );
    }

    if config.dry_run {
        let mut seeder = Seeder::from_config(MemoryPersistence::new(), &config);
        let result = seeder.run(session).await;
        for (table, rows) in seeder.store().tables() {
            for row in rows {
                println!("{}", serde_json::json!({ "table": table, "row": row }));
            }
        }
        let report = result?;
        tracing::info!("Dry run completed: {} rows", report.total_rows());
        return Ok(());
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pets (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            "type" VARCHAR(25) NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    let mut seeder = Seeder::from_config(PgPersistence::new(pool), &config);
    let report = seeder.run(session).await?;

    // Summary output
    tracing::info!("Seed completed in {} ms", report.elapsed_ms);
    for table in &report.tables {
        tracing::info!("  {}: {} rows", table.table, table.outcome.committed_rows());
    }

    Ok(())
}
