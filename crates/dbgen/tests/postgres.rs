//! Seeding against a real PostgreSQL database.
//!
//! To run these tests, you need a PostgreSQL database and the DATABASE_URL
//! environment variable set.
//!
//! Run with: `DATABASE_URL=postgres://... cargo nextest run -p dbgen postgres`
//!
//! Each test creates its own uniquely named table and drops it afterwards.

use std::env;

use dbgen::prelude::*;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};

/// Get database pool, skipping tests if DATABASE_URL is not set.
async fn get_test_pool() -> Option<PgPool> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    match PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            None
        }
    }
}

async fn create_pets_table(pool: &PgPool, name: &str) -> Table {
    sqlx::query(&format!(
        r#"
        CREATE TABLE {name} (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(16) NOT NULL,
            "type" VARCHAR(25) NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .expect("Failed to create test table");

    Table::new(name)
        .with_column(Column::new("id", ColumnType::BigSerial))
        .with_column(Column::new("name", ColumnType::Varchar { max_len: 16 }))
        .with_column(Column::new("type", ColumnType::enumeration(25, ["DOG", "CAT"])))
}

async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
        .get("n")
}

async fn drop_table(pool: &PgPool, table: &str) {
    let _ = sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(pool)
        .await;
}

fn unique_name(prefix: &str) -> String {
    let suffix: u32 = rand::random();
    format!("{prefix}_{suffix}")
}

#[tokio::test]
async fn test_seed_pets_commits_rows() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let name = unique_name("dbgen_pets");
    let pets = create_pets_table(&pool, &name).await;

    let mut seeder = Seeder::new(PgPersistence::new(pool.clone())).with_seed(12345);
    let result = seeder
        .generate(|session| {
            session.table(&pets, |t| {
                t.set_row_count(25)?.set_generators(vec![
                    ColumnBinding::new(pets.column("name")?, StringGenerator::new(8..=16)?)?,
                    ColumnBinding::new(pets.column("type")?, EnumGenerator::new(["DOG", "CAT"])?)?,
                ])?;
                Ok(())
            })?;
            Ok(())
        })
        .await;

    let count = count_rows(&pool, &name).await;
    drop_table(&pool, &name).await;

    assert!(result.is_ok(), "seeding failed: {result:?}");
    assert_eq!(count, 25);
}

#[tokio::test]
async fn test_constraint_violation_rolls_back_table() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let name = unique_name("dbgen_pets");
    let pets = create_pets_table(&pool, &name).await;

    // The schema handle claims a wider column than the database has,
    // so the database rejects the first long name.
    let lying = Table::new(&name)
        .with_column(Column::new("id", ColumnType::BigSerial))
        .with_column(Column::new("name", ColumnType::Varchar { max_len: 64 }))
        .with_column(pets.column("type").unwrap().clone());

    let mut seeder = Seeder::new(PgPersistence::new(pool.clone()));
    let result = seeder
        .generate(|session| {
            session.table(&lying, |t| {
                t.set_row_count(10)?.set_generators(vec![
                    ColumnBinding::new(lying.column("name")?, StringGenerator::fixed(64))?,
                    ColumnBinding::new(lying.column("type")?, EnumGenerator::new(["DOG"])?)?,
                ])?;
                Ok(())
            })?;
            Ok(())
        })
        .await;

    let count = count_rows(&pool, &name).await;
    drop_table(&pool, &name).await;

    assert!(matches!(result, Err(SeedError::TablesFailed(_))));
    assert_eq!(count, 0);
}
