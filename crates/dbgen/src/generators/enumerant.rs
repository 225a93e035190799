//! Uniform selection from a fixed set of enumerated constants.

use rand::Rng;
use rand::rngs::StdRng;

use super::{ColumnGenerator, incompatible};
use crate::errors::DeclarationError;
use crate::schema::{Column, ColumnType};
use crate::value::Value;

/// A constant that is stored in the database by name.
pub trait Enumerant: Clone + Send + Sync + 'static {
    /// Name stored in the column.
    fn as_str(&self) -> &str;
}

impl Enumerant for &'static str {
    fn as_str(&self) -> &str {
        self
    }
}

impl Enumerant for String {
    fn as_str(&self) -> &str {
        self
    }
}

/// Picks one of a caller-supplied, ordered set of constants uniformly at random.
#[derive(Debug, Clone)]
pub struct EnumGenerator<T> {
    values: Vec<T>,
}

impl<T: Enumerant> EnumGenerator<T> {
    /// Creates a generator over `values`. Fails if the set is empty.
    pub fn new(values: impl IntoIterator<Item = T>) -> Result<Self, DeclarationError> {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return Err(DeclarationError::EmptyEnumerantSet);
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Produces one constant.
    pub fn produce(&self, rng: &mut impl Rng) -> T {
        self.values[rng.gen_range(0..self.values.len())].clone()
    }
}

impl<T: Enumerant> ColumnGenerator for EnumGenerator<T> {
    fn kind(&self) -> &'static str {
        "enum"
    }

    fn check_column(&self, column: &Column) -> Result<(), DeclarationError> {
        let ColumnType::Enum { max_len, domain } = column.ty() else {
            return Err(incompatible(self, column, "column is not an enumeration"));
        };

        for value in &self.values {
            let name = value.as_str();
            if !domain.iter().any(|d| d == name) {
                return Err(incompatible(
                    self,
                    column,
                    format!("{name} is not in the column domain"),
                ));
            }
            if name.chars().count() > *max_len {
                return Err(incompatible(
                    self,
                    column,
                    format!("{name} is longer than {max_len} chars"),
                ));
            }
        }
        Ok(())
    }

    fn generate(&self, rng: &mut StdRng) -> Value {
        Value::Enum(self.produce(rng).as_str().to_string())
    }
}
