//! Column value generators.
//!
//! Each generator is a stateless production function over its parameters.
//! Randomness comes from the caller's RNG, so one generator can fill an
//! unbounded number of rows without reset logic:
//! - [`StringGenerator`]: random `[A-Za-z0-9_]` strings within a length range
//! - [`EnumGenerator`]: uniform pick from a caller-supplied set of constants
//! - [`IntRangeGenerator`]: uniform integers within an inclusive range
//! - [`NameGenerator`]: realistic first names
//! - [`OptionalGenerator`]: `NULL` for a share of rows, otherwise another generator

pub mod enumerant;
pub mod name;
pub mod numeric;
pub mod optional;
pub mod string;

pub use enumerant::{EnumGenerator, Enumerant};
pub use name::NameGenerator;
pub use numeric::IntRangeGenerator;
pub use optional::OptionalGenerator;
pub use string::StringGenerator;

use rand::rngs::StdRng;

use crate::errors::DeclarationError;
use crate::schema::Column;
use crate::value::Value;

/// Type-erased capability shared by every generator a column can be bound to.
pub trait ColumnGenerator: Send + Sync {
    /// Generator kind, used in error messages and logs.
    fn kind(&self) -> &'static str;

    /// Checks that every value this generator can produce fits `column`.
    fn check_column(&self, column: &Column) -> Result<(), DeclarationError>;

    /// Produces one value.
    fn generate(&self, rng: &mut StdRng) -> Value;
}

/// Builds a [`DeclarationError::IncompatibleColumn`] for `generator` and `column`.
pub(crate) fn incompatible(
    generator: &dyn ColumnGenerator,
    column: &Column,
    reason: impl Into<String>,
) -> DeclarationError {
    DeclarationError::IncompatibleColumn {
        generator: generator.kind(),
        column_type: column.ty().as_str(),
        table: column.table().to_string(),
        column: column.name().to_string(),
        reason: reason.into(),
    }
}
