//! The migration context.
//!
//! An ordered, append-only collection of pending expressions for one
//! migration step. Expressions keep the order in which they were appended,
//! so satellites always follow the table they reference.

use tracing::trace;

use crate::builder::CreateTableBuilder;
use crate::config::MigrationConfig;
use crate::dialect::DatabaseType;
use crate::error::Result;
use crate::expressions::{CreateTableExpression, MigrationExpression};
use crate::schema::TableDefinition;

/// Collects the expressions produced while authoring a migration.
///
/// The context performs no locking; callers sharing one across threads must
/// serialize access themselves.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    database_type: DatabaseType,
    supported_database_types: Vec<DatabaseType>,
    expressions: Vec<MigrationExpression>,
}

impl MigrationContext {
    /// Creates an empty context for `database_type`, supporting every database.
    #[must_use]
    pub fn new(database_type: DatabaseType) -> Self {
        Self {
            database_type,
            supported_database_types: Vec::new(),
            expressions: Vec::new(),
        }
    }

    /// Creates an empty context from a configuration.
    #[must_use]
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self::new(config.database_type)
            .with_supported_database_types(&config.supported_database_types)
    }

    /// Restricts the expressions created from now on to `database_types`.
    #[must_use]
    pub fn with_supported_database_types(mut self, database_types: &[DatabaseType]) -> Self {
        self.supported_database_types = database_types.to_vec();
        self
    }

    /// Returns the database the migration is running against.
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.database_type
    }

    /// Returns the databases new expressions apply to; empty means all.
    #[must_use]
    pub fn supported_database_types(&self) -> &[DatabaseType] {
        &self.supported_database_types
    }

    /// Appends an expression and returns its position.
    pub fn append(&mut self, expression: impl Into<MigrationExpression>) -> usize {
        let expression = expression.into();
        trace!(
            position = self.expressions.len(),
            expression = %expression.description(),
            "Appending expression"
        );
        self.expressions.push(expression);
        self.expressions.len() - 1
    }

    /// Starts a CREATE TABLE expression and returns the builder for it.
    ///
    /// The table expression is appended immediately, ahead of any satellite
    /// expression the builder produces.
    pub fn create_table(&mut self, name: impl Into<String>) -> CreateTableBuilder<'_> {
        let table = TableDefinition::new(name, self.database_type);
        let expression = CreateTableExpression::new(self.supported_database_types.clone(), table);
        let position = self.append(expression);
        CreateTableBuilder::new(self, position)
    }

    /// Returns all expressions in append order.
    #[must_use]
    pub fn expressions(&self) -> &[MigrationExpression] {
        &self.expressions
    }

    pub(crate) fn expression_mut(&mut self, position: usize) -> Option<&mut MigrationExpression> {
        self.expressions.get_mut(position)
    }

    /// Returns the expressions that apply to `database_type`, in append order.
    pub fn expressions_for(
        &self,
        database_type: DatabaseType,
    ) -> impl Iterator<Item = &MigrationExpression> {
        self.expressions
            .iter()
            .filter(move |e| e.is_supported_by(database_type))
    }

    /// Returns the number of expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Returns true if no expression has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Consumes the context and returns its expressions.
    #[must_use]
    pub fn into_expressions(self) -> Vec<MigrationExpression> {
        self.expressions
    }

    /// Serializes the expressions to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.expressions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::CreateIndexExpression;
    use crate::schema::IndexDefinition;

    fn index_on(table: &str) -> CreateIndexExpression {
        CreateIndexExpression::new(
            vec![DatabaseType::PostgreSql],
            IndexDefinition {
                name: None,
                schema_name: None,
                table_name: table.to_string(),
                is_unique: false,
                columns: vec!["id".to_string()],
            },
        )
    }

    #[test]
    fn test_append_preserves_order() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer);
        assert!(context.is_empty());

        assert_eq!(context.append(index_on("a")), 0);
        assert_eq!(context.append(index_on("b")), 1);

        let tables: Vec<&str> = context
            .expressions()
            .iter()
            .map(|e| match e {
                MigrationExpression::CreateIndex(e) => e.index.table_name.as_str(),
                _ => panic!("Expected CreateIndex"),
            })
            .collect();
        assert_eq!(tables, vec!["a", "b"]);
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_create_table_appends_table_expression() {
        let mut context = MigrationContext::new(DatabaseType::MySql)
            .with_supported_database_types(&[DatabaseType::MySql]);
        context.create_table("users");

        match &context.expressions()[0] {
            MigrationExpression::CreateTable(e) => {
                assert_eq!(e.table.name, "users");
                assert_eq!(e.table.database_type, DatabaseType::MySql);
                assert_eq!(e.supported_database_types, vec![DatabaseType::MySql]);
            }
            _ => panic!("Expected CreateTable"),
        }
    }

    #[test]
    fn test_expressions_for_filters_by_database() {
        let mut context = MigrationContext::new(DatabaseType::PostgreSql);
        context.create_table("users");
        context.append(index_on("users"));

        assert_eq!(context.expressions_for(DatabaseType::PostgreSql).count(), 2);
        assert_eq!(context.expressions_for(DatabaseType::MySql).count(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = MigrationConfig {
            database_type: DatabaseType::Sqlite,
            supported_database_types: vec![DatabaseType::Sqlite, DatabaseType::MySql],
        };
        let context = MigrationContext::from_config(&config);
        assert_eq!(context.database_type(), DatabaseType::Sqlite);
        assert_eq!(
            context.supported_database_types(),
            &[DatabaseType::Sqlite, DatabaseType::MySql]
        );
    }

    #[test]
    fn test_to_json_lists_expressions() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer);
        context.create_table("users");

        let json = context.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["CreateTable"]["table"]["name"], "users");
        assert_eq!(value[0]["CreateTable"]["table"]["database_type"], "sqlserver");
    }
}
