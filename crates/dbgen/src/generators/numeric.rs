//! Integer generation.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::rngs::StdRng;

use super::{ColumnGenerator, incompatible};
use crate::errors::DeclarationError;
use crate::schema::{Column, ColumnType};
use crate::value::Value;

/// Uniform integers from an inclusive range.
#[derive(Debug, Clone)]
pub struct IntRangeGenerator {
    min: i64,
    max: i64,
}

impl IntRangeGenerator {
    pub fn new(range: RangeInclusive<i64>) -> Result<Self, DeclarationError> {
        let (min, max) = range.into_inner();
        if min > max {
            return Err(DeclarationError::InvertedIntRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn produce(&self, rng: &mut impl Rng) -> i64 {
        rng.gen_range(self.min..=self.max)
    }
}

impl ColumnGenerator for IntRangeGenerator {
    fn kind(&self) -> &'static str {
        "int_range"
    }

    fn check_column(&self, column: &Column) -> Result<(), DeclarationError> {
        match column.ty() {
            ColumnType::BigInt => Ok(()),
            _ => Err(incompatible(self, column, "column does not hold integers")),
        }
    }

    fn generate(&self, rng: &mut StdRng) -> Value {
        Value::Int(self.produce(rng))
    }
}
