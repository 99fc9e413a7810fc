//! PostgreSQL dialect descriptor.

use super::MigrationDialect;

/// PostgreSQL migration dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl MigrationDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn embeds_primary_key_in_create_table(&self) -> bool {
        false
    }
}
