//! Declarative test data seeding.
//!
//! A [`GenerationSession`](builders::GenerationSession) declares, per table, a
//! row count and the generators that fill each column. A
//! [`Seeder`](db::Seeder) then inserts the rows, one transaction per table, in
//! declaration order.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dbgen::prelude::*;
//!
//! let pets = Table::new("pets")
//!     .with_column(Column::new("id", ColumnType::BigSerial))
//!     .with_column(Column::new("name", ColumnType::Varchar { max_len: 255 }))
//!     .with_column(Column::new("type", ColumnType::enumeration(25, ["DOG", "CAT"])));
//!
//! let mut seeder = Seeder::new(PgPersistence::new(pool)).with_seed(12345);
//! let report = seeder
//!     .generate(|session| {
//!         session.table(&pets, |t| {
//!             t.set_row_count(25)?.set_generators(vec![
//!                 ColumnBinding::new(pets.column("name")?, StringGenerator::new(16..=64)?)?,
//!                 ColumnBinding::new(pets.column("type")?, EnumGenerator::new(["DOG", "CAT"])?)?,
//!             ])?;
//!             Ok(())
//!         })?;
//!         Ok(())
//!     })
//!     .await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod errors;
pub mod generators;
pub mod schema;
pub mod value;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{ColumnBinding, DEFAULT_ROWS, GenerationSession, TableEntry};
    pub use crate::config::{FailurePolicy, SeedConfig};
    pub use crate::db::{
        MemoryPersistence, PersistError, Persistence, PgPersistence, RunReport, SeedError, Seeder,
        TableOutcome,
    };
    pub use crate::errors::{ConfigStateError, DeclarationError};
    pub use crate::generators::{
        ColumnGenerator, EnumGenerator, Enumerant, IntRangeGenerator, NameGenerator,
        OptionalGenerator, StringGenerator,
    };
    pub use crate::schema::{Column, ColumnType, Table};
    pub use crate::value::{Record, Value};
}
