//! Table plans and the session that collects them.

use std::collections::HashSet;

use rand::rngs::StdRng;

use super::ColumnBinding;
use crate::errors::{ConfigStateError, DeclarationError};
use crate::schema::Table;
use crate::value::Record;

/// Rows generated for a table unless overridden.
pub const DEFAULT_ROWS: usize = 50;

/// Declared intent to fill one table with `rows` generated records.
///
/// # Example
///
/// ```rust,ignore
/// session.table(&pets, |t| {
///     t.set_row_count(25)?.set_generators(vec![
///         ColumnBinding::new(pets.column("name")?, StringGenerator::new(16..=64)?)?,
///         ColumnBinding::new(pets.column("type")?, EnumGenerator::new(["DOG", "CAT"])?)?,
///     ])?;
///     Ok(())
/// })?;
/// ```
#[derive(Debug)]
pub struct TableEntry {
    table: Table,
    rows: usize,
    generators: Option<Vec<ColumnBinding>>,
}

impl TableEntry {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            rows: DEFAULT_ROWS,
            generators: None,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Overrides the number of rows to generate. Zero is rejected.
    pub fn set_row_count(&mut self, rows: usize) -> Result<&mut Self, DeclarationError> {
        if rows == 0 {
            return Err(DeclarationError::ZeroRowCount {
                table: self.table.name().to_string(),
            });
        }
        self.rows = rows;
        Ok(self)
    }

    /// Sets the column bindings, in the order they are applied to each record.
    ///
    /// May only be called once. Every binding must target a column of this
    /// table, no column may be bound twice, and every required column must be
    /// covered.
    pub fn set_generators(
        &mut self,
        bindings: Vec<ColumnBinding>,
    ) -> Result<&mut Self, DeclarationError> {
        let table = self.table.name();
        if self.generators.is_some() {
            return Err(DeclarationError::GeneratorsAlreadySet {
                table: table.to_string(),
            });
        }

        let mut bound = HashSet::new();
        for binding in &bindings {
            let column = binding.column();
            let owned = column.table() == table
                && self
                    .table
                    .column(column.name())
                    .is_ok_and(|own| own == column);
            if !owned {
                return Err(DeclarationError::ForeignColumn {
                    expected: table.to_string(),
                    table: column.table().to_string(),
                    column: column.name().to_string(),
                });
            }
            if !bound.insert(column.name()) {
                return Err(DeclarationError::DuplicateBinding {
                    table: table.to_string(),
                    column: column.name().to_string(),
                });
            }
        }

        if let Some(missing) = self
            .table
            .required_columns()
            .find(|c| !bound.contains(c.name()))
        {
            return Err(DeclarationError::UnboundRequiredColumn {
                table: table.to_string(),
                column: missing.name().to_string(),
            });
        }

        self.generators = Some(bindings);
        Ok(self)
    }

    /// Returns the bindings, failing if they were never set.
    pub fn generators(&self) -> Result<&[ColumnBinding], ConfigStateError> {
        self.generators
            .as_deref()
            .ok_or_else(|| ConfigStateError::GeneratorsUnset {
                table: self.table.name().to_string(),
            })
    }

    /// Builds one record by applying every binding in declared order.
    pub fn build_record(&self, rng: &mut StdRng) -> Result<Record, ConfigStateError> {
        let mut record = Record::new();
        for binding in self.generators()? {
            binding.apply(&mut record, rng);
        }
        Ok(record)
    }
}

/// Ordered collection of table plans for one generation run.
#[derive(Debug, Default)]
pub struct GenerationSession {
    entries: Vec<TableEntry>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session by running `build` against an empty one.
    pub fn build<F>(build: F) -> Result<Self, DeclarationError>
    where
        F: FnOnce(&mut Self) -> Result<(), DeclarationError>,
    {
        let mut session = Self::new();
        build(&mut session)?;
        Ok(session)
    }

    /// Declares a table plan and configures it with `configure`.
    ///
    /// The entry is only appended when `configure` succeeds.
    pub fn table<F>(&mut self, table: &Table, configure: F) -> Result<&mut Self, DeclarationError>
    where
        F: FnOnce(&mut TableEntry) -> Result<(), DeclarationError>,
    {
        let mut entry = TableEntry::new(table);
        configure(&mut entry)?;
        self.entries.push(entry);
        Ok(self)
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every entry is ready to run.
    pub fn validate(&self) -> Result<(), ConfigStateError> {
        for entry in &self.entries {
            entry.generators()?;
        }
        Ok(())
    }

    pub(crate) fn into_entries(self) -> Vec<TableEntry> {
        self.entries
    }
}
