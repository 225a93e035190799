//! Schema handles consumed by the generation DSL.
//!
//! A [`Table`] names a database table and lists its typed columns. The seeding
//! core only reads column identity and type from it; creating or migrating the
//! table is left to the persistence layer.

use crate::errors::DeclarationError;

/// Declared type of a column, including the constraints generators must honor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Bounded string column.
    Varchar { max_len: usize },
    /// Unbounded string column.
    Text,
    /// Enumeration stored by name in a bounded string column.
    Enum { max_len: usize, domain: Vec<String> },
    /// 64-bit integer.
    BigInt,
    /// Auto-incrementing 64-bit key assigned by the database.
    BigSerial,
}

impl ColumnType {
    /// Builds an enum column type from the names of its constants.
    pub fn enumeration<I, S>(max_len: usize, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            max_len,
            domain: domain.into_iter().map(Into::into).collect(),
        }
    }

    /// Maximum string length accepted by the column, if it holds strings.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Self::Varchar { max_len } | Self::Enum { max_len, .. } => Some(*max_len),
            Self::Text => Some(usize::MAX),
            Self::BigInt | Self::BigSerial => None,
        }
    }

    /// Short SQL-ish name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Varchar { .. } => "varchar",
            Self::Text => "text",
            Self::Enum { .. } => "enum",
            Self::BigInt => "bigint",
            Self::BigSerial => "bigserial",
        }
    }
}

/// A typed column belonging to a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    table: String,
    name: String,
    ty: ColumnType,
    nullable: bool,
    has_default: bool,
}

impl Column {
    /// Creates a non-nullable column without a database default.
    ///
    /// The owning table is filled in when the column is added with
    /// [`Table::with_column`].
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        let has_default = matches!(ty, ColumnType::BigSerial);
        Self {
            table: String::new(),
            name: name.into(),
            ty,
            nullable: false,
            has_default,
        }
    }

    /// Marks the column as accepting NULL.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the column as having a database-side default.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ColumnType {
        &self.ty
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// A required column must receive a value from some binding on every insert.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.has_default
    }
}

/// Handle identifying a table and its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column, taking ownership of it on behalf of this table.
    pub fn with_column(mut self, mut column: Column) -> Self {
        column.table = self.name.clone();
        self.columns.push(column);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, DeclarationError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DeclarationError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Columns that have to be covered by a generator binding.
    pub fn required_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_required())
    }
}
