//! Database integration for seeding generated rows.
//!
//! The [`Seeder`] drives a [`GenerationSession`](crate::builders::GenerationSession)
//! through a [`Persistence`] backend, one transaction per declared table.

mod memory;
mod persistence;
mod postgres;
mod seeder;

pub use memory::MemoryPersistence;
pub use persistence::{PersistError, Persistence};
pub use postgres::PgPersistence;
pub use seeder::{RunReport, SeedError, Seeder, TableOutcome, TableReport};
