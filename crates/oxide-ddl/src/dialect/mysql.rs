//! MySQL dialect descriptor.

use super::MigrationDialect;

/// MySQL migration dialect.
///
/// MySQL creates the primary key together with the table and fails when the
/// same constraint is added again afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MigrationDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn embeds_primary_key_in_create_table(&self) -> bool {
        true
    }
}
