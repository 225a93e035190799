//! Nullable columns.

use rand::Rng;
use rand::rngs::StdRng;

use super::{ColumnGenerator, incompatible};
use crate::errors::DeclarationError;
use crate::schema::Column;
use crate::value::Value;

/// Wraps another generator and produces `NULL` for a share of the rows.
#[derive(Debug, Clone)]
pub struct OptionalGenerator<G> {
    inner: G,
    null_percent: u8,
}

impl<G: ColumnGenerator> OptionalGenerator<G> {
    /// `null_percent` of the produced values, on average, are `NULL`.
    pub fn new(inner: G, null_percent: u8) -> Result<Self, DeclarationError> {
        if null_percent > 100 {
            return Err(DeclarationError::NullPercentOutOfRange {
                percent: null_percent,
            });
        }
        Ok(Self {
            inner,
            null_percent,
        })
    }
}

impl<G: ColumnGenerator> ColumnGenerator for OptionalGenerator<G> {
    fn kind(&self) -> &'static str {
        "optional"
    }

    fn check_column(&self, column: &Column) -> Result<(), DeclarationError> {
        if self.null_percent > 0 && !column.is_nullable() {
            return Err(incompatible(self, column, "column is not nullable"));
        }
        self.inner.check_column(column)
    }

    fn generate(&self, rng: &mut StdRng) -> Value {
        if rng.gen_ratio(u32::from(self.null_percent), 100) {
            Value::Null
        } else {
            self.inner.generate(rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::IntRangeGenerator;
    use crate::schema::ColumnType;
    use rand::SeedableRng;

    fn ages() -> IntRangeGenerator {
        IntRangeGenerator::new(1..=20).unwrap()
    }

    #[test]
    fn test_mixes_nulls_and_values() {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = OptionalGenerator::new(ages(), 50).unwrap();
        let values: Vec<Value> = (0..1000).map(|_| generator.generate(&mut rng)).collect();

        let nulls = values.iter().filter(|v| **v == Value::Null).count();
        assert!((350..=650).contains(&nulls), "nulls: {nulls}");
        assert!(
            values
                .iter()
                .all(|v| matches!(v, Value::Null | Value::Int(1..=20)))
        );
    }

    #[test]
    fn test_extremes() {
        let mut rng = StdRng::seed_from_u64(5);
        let never = OptionalGenerator::new(ages(), 0).unwrap();
        let always = OptionalGenerator::new(ages(), 100).unwrap();
        assert!((0..100).all(|_| never.generate(&mut rng) != Value::Null));
        assert!((0..100).all(|_| always.generate(&mut rng) == Value::Null));
    }

    #[test]
    fn test_percent_out_of_range() {
        assert_eq!(
            OptionalGenerator::new(ages(), 101).unwrap_err(),
            DeclarationError::NullPercentOutOfRange { percent: 101 }
        );
    }

    #[test]
    fn test_requires_nullable_column() {
        let generator = OptionalGenerator::new(ages(), 10).unwrap();
        assert!(
            generator
                .check_column(&Column::new("age", ColumnType::BigInt))
                .is_err()
        );
        assert!(
            generator
                .check_column(&Column::new("age", ColumnType::BigInt).nullable())
                .is_ok()
        );
        assert!(
            generator
                .check_column(&Column::new("nickname", ColumnType::Text).nullable())
                .is_err()
        );
    }
}
