//! Random string generation.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::rngs::StdRng;

use super::{ColumnGenerator, incompatible};
use crate::errors::DeclarationError;
use crate::schema::{Column, ColumnType};
use crate::value::Value;

/// Characters random strings are drawn from.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_";

/// Generates strings of `[A-Za-z0-9_]` with a length picked from an inclusive range.
#[derive(Debug, Clone)]
pub struct StringGenerator {
    min_len: usize,
    max_len: usize,
}

impl StringGenerator {
    /// Creates a generator for lengths in `lengths`.
    ///
    /// Fails if the range is inverted.
    pub fn new(lengths: RangeInclusive<usize>) -> Result<Self, DeclarationError> {
        let (min_len, max_len) = lengths.into_inner();
        if min_len > max_len {
            return Err(DeclarationError::InvertedLengthRange {
                min: min_len,
                max: max_len,
            });
        }
        Ok(Self { min_len, max_len })
    }

    /// Creates a generator that always produces strings of exactly `len` characters.
    pub fn fixed(len: usize) -> Self {
        Self {
            min_len: len,
            max_len: len,
        }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Produces one random string.
    pub fn produce(&self, rng: &mut impl Rng) -> String {
        let len = rng.gen_range(self.min_len..=self.max_len);
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl ColumnGenerator for StringGenerator {
    fn kind(&self) -> &'static str {
        "string"
    }

    fn check_column(&self, column: &Column) -> Result<(), DeclarationError> {
        match column.ty() {
            ColumnType::Varchar { max_len } if self.max_len > *max_len => Err(incompatible(
                self,
                column,
                format!("strings up to {} chars exceed limit {max_len}", self.max_len),
            )),
            ColumnType::Varchar { .. } | ColumnType::Text => Ok(()),
            _ => Err(incompatible(self, column, "column does not hold free text")),
        }
    }

    fn generate(&self, rng: &mut StdRng) -> Value {
        Value::Text(self.produce(rng))
    }
}
