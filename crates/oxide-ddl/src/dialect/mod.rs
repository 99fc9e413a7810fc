//! Database dialect descriptors.
//!
//! The table builder asks a dialect a single question: whether primary keys
//! are declared inline in the CREATE TABLE statement. Dialects that do so
//! reject a second, separate primary key constraint for the same table.

mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::{SqlCeDialect, SqlServerDialect};

use crate::error::MigrateError;

/// Capabilities of a database that affect which expressions are emitted.
pub trait MigrationDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns whether primary keys are embedded in CREATE TABLE DDL.
    ///
    /// When true, no separate primary key constraint expression is emitted.
    fn embeds_primary_key_in_create_table(&self) -> bool;
}

/// The database engines a migration can target.
///
/// Serializes as the lowercase name; deserializes through [`FromStr`], so
/// the same names and aliases are accepted in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DatabaseType {
    /// Microsoft SQL Server.
    SqlServer,
    /// Microsoft SQL Server Compact Edition.
    SqlCe,
    /// MySQL.
    MySql,
    /// SQLite.
    Sqlite,
    /// PostgreSQL.
    PostgreSql,
}

impl DatabaseType {
    /// All known database types.
    pub const ALL: [Self; 5] = [
        Self::SqlServer,
        Self::SqlCe,
        Self::MySql,
        Self::Sqlite,
        Self::PostgreSql,
    ];

    /// Returns the dialect descriptor for this database.
    #[must_use]
    pub fn dialect(self) -> &'static dyn MigrationDialect {
        match self {
            Self::SqlServer => &SqlServerDialect,
            Self::SqlCe => &SqlCeDialect,
            Self::MySql => &MySqlDialect,
            Self::Sqlite => &SqliteDialect,
            Self::PostgreSql => &PostgresDialect,
        }
    }

    /// Shorthand for the dialect's primary key capability.
    #[must_use]
    pub fn embeds_primary_key_in_create_table(self) -> bool {
        self.dialect().embeds_primary_key_in_create_table()
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dialect().name())
    }
}

impl FromStr for DatabaseType {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "sqlce" => Ok(Self::SqlCe),
            "mysql" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            _ => Err(MigrateError::UnknownDatabaseType(s.to_string())),
        }
    }
}

impl TryFrom<String> for DatabaseType {
    type Error = MigrateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
