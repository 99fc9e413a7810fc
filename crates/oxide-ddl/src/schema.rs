//! Schema definition records.
//!
//! Plain data describing one schema object each. The table builder creates
//! and fills these; the expressions in [`crate::expressions`] own them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dialect::DatabaseType;
use crate::error::MigrateError;

/// Column data types recorded by the type continuation.
///
/// These are records only; mapping them to dialect type names is left to the
/// renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// Boolean.
    Boolean,
    /// Variable-length string, with an optional maximum length.
    String(Option<usize>),
    /// Unbounded text.
    Text,
    /// Date and time.
    DateTime,
    /// Globally unique identifier.
    Guid,
    /// Decimal with precision and scale.
    Decimal(u8, u8),
    /// Double precision floating point.
    Double,
    /// Binary data.
    Binary,
    /// A type name passed through verbatim.
    Custom(String),
}

/// Database-side functions usable as column defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemMethod {
    /// A new random GUID.
    NewGuid,
    /// A new sequential GUID.
    NewSequentialId,
    /// The current local date and time.
    CurrentDateTime,
    /// The current UTC date and time.
    CurrentUtcDateTime,
}

/// A literal default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    /// NULL.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    String(String),
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Default value for a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// No default value.
    #[default]
    None,
    /// A database function evaluated on insert.
    Method(SystemMethod),
    /// A literal value.
    Literal(LiteralValue),
}

impl DefaultValue {
    /// Returns true if a default is set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Foreign key cascade rule (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Rule {
    /// No rule; the database default applies.
    #[default]
    None,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the referencing columns to NULL.
    SetNull,
    /// Set the referencing columns to their default value.
    SetDefault,
    /// Reject the delete/update while referencing rows exist.
    Restrict,
}

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintType {
    /// PRIMARY KEY constraint.
    PrimaryKey,
    /// UNIQUE constraint.
    Unique,
    /// Non-unique index constraint.
    NonUnique,
}

/// Definition of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Name of the owning table.
    pub table_name: String,
    /// Declared type, if the type continuation was used.
    pub column_type: Option<ColumnType>,
    /// Whether the value is generated by the database on insert.
    pub is_identity: bool,
    /// Whether the column allows NULL values.
    pub is_nullable: bool,
    /// Whether the column is part of the primary key.
    pub is_primary_key: bool,
    /// Explicit primary key constraint name.
    pub primary_key_name: Option<String>,
    /// Whether an index was requested for the column.
    pub is_indexed: bool,
    /// Whether a unique index was requested for the column.
    pub is_unique: bool,
    /// Whether the column takes part in a foreign key.
    pub is_foreign_key: bool,
    /// Default value.
    pub default_value: DefaultValue,
}

impl ColumnDefinition {
    /// Creates a column owned by `table_name` with every flag cleared.
    #[must_use]
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            column_type: None,
            is_identity: false,
            is_nullable: false,
            is_primary_key: false,
            primary_key_name: None,
            is_indexed: false,
            is_unique: false,
            is_foreign_key: false,
            default_value: DefaultValue::None,
        }
    }
}

/// Definition of a table being created.
///
/// Column order is the DDL column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Schema name, if any.
    pub schema_name: Option<String>,
    /// Table name.
    pub name: String,
    /// Database the table is created for.
    pub database_type: DatabaseType,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Creates an empty table definition.
    #[must_use]
    pub fn new(name: impl Into<String>, database_type: DatabaseType) -> Self {
        Self {
            schema_name: None,
            name: name.into(),
            database_type,
            columns: Vec::new(),
        }
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the names of the primary key columns in declaration order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
    }
}

/// Definition of an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name; the renderer picks one when absent.
    pub name: Option<String>,
    /// Schema of the indexed table.
    pub schema_name: Option<String>,
    /// Indexed table.
    pub table_name: String,
    /// Whether this is a unique index.
    pub is_unique: bool,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
}

/// Definition of a table constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    /// Constraint name; the renderer picks one when absent.
    pub name: Option<String>,
    /// Constrained table.
    pub table_name: String,
    /// Constraint kind.
    pub constraint_type: ConstraintType,
    /// Constrained columns, in key order.
    pub columns: Vec<String>,
}

/// Definition of a foreign key.
///
/// `primary_columns()[i]` is referenced by `foreign_columns()[i]`. Pairs are
/// only added through [`ForeignKeyDefinition::add_column_pair`], and
/// deserialization rejects lists of different lengths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawForeignKeyDefinition")]
pub struct ForeignKeyDefinition {
    /// Constraint name; the renderer picks one when absent.
    pub name: Option<String>,
    /// Referenced (primary side) table.
    pub primary_table: String,
    /// Schema of the primary side table.
    pub primary_table_schema: Option<String>,
    /// Referencing (foreign side) table.
    pub foreign_table: String,
    /// Schema of the foreign side table.
    pub foreign_table_schema: Option<String>,
    primary_columns: Vec<String>,
    foreign_columns: Vec<String>,
    /// Rule applied on delete.
    pub on_delete: Rule,
    /// Rule applied on update.
    pub on_update: Rule,
}

#[derive(Deserialize)]
struct RawForeignKeyDefinition {
    name: Option<String>,
    primary_table: String,
    primary_table_schema: Option<String>,
    foreign_table: String,
    foreign_table_schema: Option<String>,
    primary_columns: Vec<String>,
    foreign_columns: Vec<String>,
    on_delete: Rule,
    on_update: Rule,
}

impl TryFrom<RawForeignKeyDefinition> for ForeignKeyDefinition {
    type Error = MigrateError;

    fn try_from(raw: RawForeignKeyDefinition) -> Result<Self, Self::Error> {
        if raw.primary_columns.len() != raw.foreign_columns.len() {
            warn!(
                primary_table = %raw.primary_table,
                foreign_table = %raw.foreign_table,
                "Rejecting foreign key with unpaired columns"
            );
            return Err(MigrateError::InvalidState(format!(
                "foreign key from '{}' to '{}' has {} primary and {} foreign columns",
                raw.foreign_table,
                raw.primary_table,
                raw.primary_columns.len(),
                raw.foreign_columns.len()
            )));
        }
        Ok(Self {
            name: raw.name,
            primary_table: raw.primary_table,
            primary_table_schema: raw.primary_table_schema,
            foreign_table: raw.foreign_table,
            foreign_table_schema: raw.foreign_table_schema,
            primary_columns: raw.primary_columns,
            foreign_columns: raw.foreign_columns,
            on_delete: raw.on_delete,
            on_update: raw.on_update,
        })
    }
}

impl ForeignKeyDefinition {
    /// Creates a foreign key between two tables with no column pairs yet.
    #[must_use]
    pub fn new(primary_table: impl Into<String>, foreign_table: impl Into<String>) -> Self {
        Self {
            name: None,
            primary_table: primary_table.into(),
            primary_table_schema: None,
            foreign_table: foreign_table.into(),
            foreign_table_schema: None,
            primary_columns: Vec::new(),
            foreign_columns: Vec::new(),
            on_delete: Rule::None,
            on_update: Rule::None,
        }
    }

    /// Adds one referencing pair, keeping both column lists in step.
    pub fn add_column_pair(
        &mut self,
        primary_column: impl Into<String>,
        foreign_column: impl Into<String>,
    ) {
        self.primary_columns.push(primary_column.into());
        self.foreign_columns.push(foreign_column.into());
    }

    /// Returns the referenced columns.
    #[must_use]
    pub fn primary_columns(&self) -> &[String] {
        &self.primary_columns
    }

    /// Returns the referencing columns.
    #[must_use]
    pub fn foreign_columns(&self) -> &[String] {
        &self.foreign_columns
    }

    /// Returns the `(primary, foreign)` column pairs in key order.
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.primary_columns
            .iter()
            .zip(&self.foreign_columns)
            .map(|(p, f)| (p.as_str(), f.as_str()))
    }
}
