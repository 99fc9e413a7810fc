//! SQL Server dialect descriptors.
//!
//! Both SQL Server and SQL Server CE add the primary key in a separate
//! ALTER TABLE statement after the table is created.

use super::MigrationDialect;

/// SQL Server migration dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl MigrationDialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn embeds_primary_key_in_create_table(&self) -> bool {
        false
    }
}

/// SQL Server Compact Edition migration dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlCeDialect;

impl MigrationDialect for SqlCeDialect {
    fn name(&self) -> &'static str {
        "sqlce"
    }

    fn embeds_primary_key_in_create_table(&self) -> bool {
        false
    }
}
