//! Migration expressions.
//!
//! Each expression wraps one definition record together with the set of
//! database types it applies to. Expressions are self-contained once
//! constructed; rendering them to SQL happens elsewhere.

use serde::{Deserialize, Serialize};

use crate::dialect::DatabaseType;
use crate::schema::{
    ConstraintDefinition, ConstraintType, ForeignKeyDefinition, IndexDefinition, TableDefinition,
};

/// Returns true if `supported` is empty or contains `database_type`.
fn supports(supported: &[DatabaseType], database_type: DatabaseType) -> bool {
    supported.is_empty() || supported.contains(&database_type)
}

/// Creates a table from a [`TableDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableExpression {
    /// Database types this expression applies to; empty means all.
    pub supported_database_types: Vec<DatabaseType>,
    /// The table being created.
    pub table: TableDefinition,
}

impl CreateTableExpression {
    /// Creates the expression.
    #[must_use]
    pub fn new(supported_database_types: Vec<DatabaseType>, table: TableDefinition) -> Self {
        Self {
            supported_database_types,
            table,
        }
    }
}

/// Creates an index from an [`IndexDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexExpression {
    /// Database types this expression applies to; empty means all.
    pub supported_database_types: Vec<DatabaseType>,
    /// The index being created.
    pub index: IndexDefinition,
}

impl CreateIndexExpression {
    /// Creates the expression.
    #[must_use]
    pub fn new(supported_database_types: Vec<DatabaseType>, index: IndexDefinition) -> Self {
        Self {
            supported_database_types,
            index,
        }
    }
}

/// Adds a constraint from a [`ConstraintDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateConstraintExpression {
    /// Database types this expression applies to; empty means all.
    pub supported_database_types: Vec<DatabaseType>,
    /// The constraint being added.
    pub constraint: ConstraintDefinition,
}

impl CreateConstraintExpression {
    /// Creates the expression.
    #[must_use]
    pub fn new(
        supported_database_types: Vec<DatabaseType>,
        constraint: ConstraintDefinition,
    ) -> Self {
        Self {
            supported_database_types,
            constraint,
        }
    }
}

/// Adds a foreign key from a [`ForeignKeyDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateForeignKeyExpression {
    /// Database types this expression applies to; empty means all.
    pub supported_database_types: Vec<DatabaseType>,
    /// The foreign key being added.
    pub foreign_key: ForeignKeyDefinition,
}

impl CreateForeignKeyExpression {
    /// Creates the expression.
    #[must_use]
    pub fn new(
        supported_database_types: Vec<DatabaseType>,
        foreign_key: ForeignKeyDefinition,
    ) -> Self {
        Self {
            supported_database_types,
            foreign_key,
        }
    }
}

/// A single pending schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MigrationExpression {
    /// Create a table.
    CreateTable(CreateTableExpression),
    /// Create an index.
    CreateIndex(CreateIndexExpression),
    /// Add a table constraint.
    CreateConstraint(CreateConstraintExpression),
    /// Add a foreign key.
    CreateForeignKey(CreateForeignKeyExpression),
}

impl MigrationExpression {
    /// Returns the database types this expression applies to.
    #[must_use]
    pub fn supported_database_types(&self) -> &[DatabaseType] {
        match self {
            Self::CreateTable(e) => &e.supported_database_types,
            Self::CreateIndex(e) => &e.supported_database_types,
            Self::CreateConstraint(e) => &e.supported_database_types,
            Self::CreateForeignKey(e) => &e.supported_database_types,
        }
    }

    /// Returns true if this expression should run on `database_type`.
    #[must_use]
    pub fn is_supported_by(&self, database_type: DatabaseType) -> bool {
        supports(self.supported_database_types(), database_type)
    }

    /// Returns a human-readable description of this expression.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable(e) => format!(
                "Create table '{}' with {} column(s)",
                e.table.name,
                e.table.columns.len()
            ),
            Self::CreateIndex(e) => {
                let kind = if e.index.is_unique {
                    "unique index"
                } else {
                    "index"
                };
                match &e.index.name {
                    Some(name) => format!(
                        "Create {kind} '{}' on table '{}' ({})",
                        name,
                        e.index.table_name,
                        e.index.columns.join(", ")
                    ),
                    None => format!(
                        "Create {kind} on table '{}' ({})",
                        e.index.table_name,
                        e.index.columns.join(", ")
                    ),
                }
            }
            Self::CreateConstraint(e) => {
                let kind = match e.constraint.constraint_type {
                    ConstraintType::PrimaryKey => "primary key",
                    ConstraintType::Unique => "unique constraint",
                    ConstraintType::NonUnique => "index constraint",
                };
                format!(
                    "Add {kind} to table '{}' ({})",
                    e.constraint.table_name,
                    e.constraint.columns.join(", ")
                )
            }
            Self::CreateForeignKey(e) => format!(
                "Add foreign key from '{}' ({}) to '{}' ({})",
                e.foreign_key.foreign_table,
                e.foreign_key.foreign_columns().join(", "),
                e.foreign_key.primary_table,
                e.foreign_key.primary_columns().join(", ")
            ),
        }
    }
}

impl From<CreateTableExpression> for MigrationExpression {
    fn from(expression: CreateTableExpression) -> Self {
        Self::CreateTable(expression)
    }
}

impl From<CreateIndexExpression> for MigrationExpression {
    fn from(expression: CreateIndexExpression) -> Self {
        Self::CreateIndex(expression)
    }
}

impl From<CreateConstraintExpression> for MigrationExpression {
    fn from(expression: CreateConstraintExpression) -> Self {
        Self::CreateConstraint(expression)
    }
}

impl From<CreateForeignKeyExpression> for MigrationExpression {
    fn from(expression: CreateForeignKeyExpression) -> Self {
        Self::CreateForeignKey(expression)
    }
}
