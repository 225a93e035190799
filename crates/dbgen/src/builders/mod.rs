//! Declarative builders for generation sessions.

mod binding;
mod session;

pub use binding::ColumnBinding;
pub use session::{DEFAULT_ROWS, GenerationSession, TableEntry};
