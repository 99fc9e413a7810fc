//! Migration context configuration.

use serde::{Deserialize, Serialize};

use crate::dialect::DatabaseType;
use crate::error::Result;

/// Settings for a [`crate::context::MigrationContext`].
///
/// ```rust
/// use oxide_ddl::config::MigrationConfig;
/// use oxide_ddl::dialect::DatabaseType;
///
/// let config = MigrationConfig::from_json(
///     r#"{ "database_type": "mysql", "supported_database_types": ["mysql", "sqlite"] }"#,
/// )
/// .unwrap();
/// assert_eq!(config.database_type, DatabaseType::MySql);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Database the migration is running against.
    pub database_type: DatabaseType,
    /// Databases the migration's expressions apply to; empty means all.
    #[serde(default)]
    pub supported_database_types: Vec<DatabaseType>,
}

impl MigrationConfig {
    /// Creates a configuration supporting every database.
    #[must_use]
    pub fn new(database_type: DatabaseType) -> Self {
        Self {
            database_type,
            supported_database_types: Vec::new(),
        }
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
