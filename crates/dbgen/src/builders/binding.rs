//! Pairing of a generator with the column it fills.

use std::fmt;

use rand::rngs::StdRng;

use crate::errors::DeclarationError;
use crate::generators::ColumnGenerator;
use crate::schema::Column;
use crate::value::{Record, Value};

/// Immutable pairing of one generator with one target column.
pub struct ColumnBinding {
    column: Column,
    generator: Box<dyn ColumnGenerator>,
}

impl ColumnBinding {
    /// Binds `generator` to `column`, checking that its values fit the column.
    pub fn new(
        column: &Column,
        generator: impl ColumnGenerator + 'static,
    ) -> Result<Self, DeclarationError> {
        generator.check_column(column)?;
        Ok(Self {
            column: column.clone(),
            generator: Box::new(generator),
        })
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn generator_kind(&self) -> &'static str {
        self.generator.kind()
    }

    /// Produces one value without recording it.
    pub fn sample(&self, rng: &mut StdRng) -> Value {
        self.generator.generate(rng)
    }

    /// Generates a value and stores it under this binding's column.
    pub fn apply(&self, record: &mut Record, rng: &mut StdRng) {
        record.set(self.column.name(), self.generator.generate(rng));
    }
}

impl fmt::Debug for ColumnBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnBinding")
            .field("table", &self.column.table())
            .field("column", &self.column.name())
            .field("generator", &self.generator.kind())
            .finish()
    }
}
