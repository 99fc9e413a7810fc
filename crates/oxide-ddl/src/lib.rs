//! Fluent CREATE TABLE builder for schema migrations.
//!
//! `oxide-ddl` turns a chain of column and constraint calls into the ordered
//! list of expressions a migration step needs to create a table:
//! - The CREATE TABLE expression holding the table definition
//! - Index expressions for `indexed()` and `unique()` columns
//! - Primary key constraint expressions, on dialects that add them separately
//! - Foreign key expressions for `foreign_key()` and `referenced_by()` columns
//!
//! # Architecture
//!
//! - **Schema** - Plain definition records (`TableDefinition`, `ColumnDefinition`, ...)
//! - **Expressions** - One expression per schema change, wrapping a definition
//! - **Context** - The ordered, append-only list of pending expressions
//! - **Builder** - The fluent API that fills definitions and appends expressions
//! - **Dialect** - Per-database capabilities the builder consults
//!
//! Rendering expressions to SQL and executing them are left to the caller.
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl::prelude::*;
//!
//! let mut context = MigrationContext::new(DatabaseType::MySql);
//! {
//!     let mut users = context.create_table("users");
//!     users.with_column("id")?.as_int32()?.identity()?.primary_key()?;
//!     users.with_column("email")?.as_string_sized(255)?.unique_named("ix_users_email")?;
//! }
//!
//! // MySQL declares the primary key inline, so only the unique index follows
//! // the CREATE TABLE expression.
//! assert_eq!(context.len(), 2);
//! # Ok::<(), MigrateError>(())
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod expressions;
pub mod schema;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::{ColumnTypeSyntax, CreateTableBuilder};
    pub use crate::config::MigrationConfig;
    pub use crate::context::MigrationContext;
    pub use crate::dialect::{DatabaseType, MigrationDialect};
    pub use crate::error::{MigrateError, Result};
    pub use crate::expressions::{
        CreateConstraintExpression, CreateForeignKeyExpression, CreateIndexExpression,
        CreateTableExpression, MigrationExpression,
    };
    pub use crate::schema::{
        ColumnDefinition, ColumnType, ConstraintDefinition, ConstraintType, DefaultValue,
        ForeignKeyDefinition, IndexDefinition, LiteralValue, Rule, SystemMethod,
        TableDefinition,
    };
}
