//! SQLite dialect descriptor.

use super::MigrationDialect;

/// SQLite migration dialect.
///
/// SQLite cannot add a primary key with ALTER TABLE, so it is always
/// declared inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl MigrationDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn embeds_primary_key_in_create_table(&self) -> bool {
        true
    }
}
