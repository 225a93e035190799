//! Realistic first names.

use fake::{Fake, faker::name::en::FirstName};
use rand::Rng;
use rand::rngs::StdRng;

use super::{ColumnGenerator, incompatible};
use crate::errors::DeclarationError;
use crate::schema::{Column, ColumnType};
use crate::value::Value;

/// Generates first names, truncated to a maximum length.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    max_len: usize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self { max_len: 255 }
    }

    /// Limits produced names to `max_len` characters.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn produce(&self, rng: &mut impl Rng) -> String {
        let name: String = FirstName().fake_with_rng(rng);
        name.chars().take(self.max_len).collect()
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnGenerator for NameGenerator {
    fn kind(&self) -> &'static str {
        "name"
    }

    fn check_column(&self, column: &Column) -> Result<(), DeclarationError> {
        match column.ty() {
            ColumnType::Varchar { max_len } if self.max_len > *max_len => Err(incompatible(
                self,
                column,
                format!("names up to {} chars exceed limit {max_len}", self.max_len),
            )),
            ColumnType::Varchar { .. } | ColumnType::Text => Ok(()),
            _ => Err(incompatible(self, column, "column does not hold free text")),
        }
    }

    fn generate(&self, rng: &mut StdRng) -> Value {
        Value::Text(self.produce(rng))
    }
}
