//! Fluent CREATE TABLE builder.
//!
//! The builder fills in the [`TableDefinition`] of a CREATE TABLE expression
//! that already sits in a [`MigrationContext`], and appends satellite
//! expressions (indexes, constraints, foreign keys) for inline column
//! modifiers as they are called.
//!
//! Two pieces of state travel along the chain: the column most recently
//! declared with [`CreateTableBuilder::with_column`], and the foreign key most
//! recently declared on that column with `foreign_key*` or `referenced_by*`.
//! Column options apply to the former and cascade rules to the latter.
//! Declaring a new column forgets the foreign key. Calling either kind before
//! its target exists is an error.
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl::prelude::*;
//!
//! let mut context = MigrationContext::new(DatabaseType::SqlServer);
//! {
//!     let mut posts = context.create_table("posts");
//!     posts.with_column("id")?.as_int32()?.identity()?.primary_key()?;
//!     posts
//!         .with_column("author_id")?
//!         .as_int32()?
//!         .not_nullable()?
//!         .foreign_key("users", "id")?
//!         .on_delete(Rule::Cascade)?;
//!     posts.with_column("slug")?.as_string_sized(200)?.unique()?;
//! }
//!
//! // CREATE TABLE, primary key constraint, foreign key, unique index.
//! assert_eq!(context.len(), 4);
//! # Ok::<(), MigrateError>(())
//! ```

use tracing::{debug, warn};

use crate::context::MigrationContext;
use crate::dialect::DatabaseType;
use crate::error::{MigrateError, Result};
use crate::expressions::{
    CreateConstraintExpression, CreateForeignKeyExpression, CreateIndexExpression,
    MigrationExpression,
};
use crate::schema::{
    ColumnDefinition, ColumnType, ConstraintDefinition, ConstraintType, DefaultValue,
    ForeignKeyDefinition, IndexDefinition, LiteralValue, Rule, SystemMethod, TableDefinition,
};

fn invalid_state(message: String) -> MigrateError {
    warn!(reason = %message, "Builder state does not match the migration context");
    MigrateError::InvalidState(message)
}

fn not_a_table(position: usize) -> MigrateError {
    invalid_state(format!(
        "expression {position} is not a CREATE TABLE expression"
    ))
}

fn no_current_column(table: &str, operation: &'static str) -> MigrateError {
    warn!(table = %table, operation, "Column option used before with_column");
    MigrateError::NoCurrentColumn { operation }
}

fn no_current_foreign_key(table: &str, operation: &'static str) -> MigrateError {
    warn!(table = %table, operation, "Cascade rule used before a foreign key");
    MigrateError::NoCurrentForeignKey { operation }
}

/// Builds the columns of a table and the expressions derived from them.
#[derive(Debug)]
pub struct CreateTableBuilder<'a> {
    context: &'a mut MigrationContext,
    table: usize,
    supported_database_types: Vec<DatabaseType>,
    current_column: Option<usize>,
    current_foreign_key: Option<usize>,
}

impl<'a> CreateTableBuilder<'a> {
    /// Binds a builder to the CREATE TABLE expression at `position`.
    ///
    /// Satellite expressions are restricted to the database types the
    /// context supports at this point.
    pub fn new(context: &'a mut MigrationContext, position: usize) -> Self {
        let supported_database_types = context.supported_database_types().to_vec();
        Self {
            context,
            table: position,
            supported_database_types,
            current_column: None,
            current_foreign_key: None,
        }
    }

    /// Returns the table definition being built.
    pub fn table(&self) -> Result<&TableDefinition> {
        match self.context.expressions().get(self.table) {
            Some(MigrationExpression::CreateTable(e)) => Ok(&e.table),
            _ => Err(not_a_table(self.table)),
        }
    }

    fn table_mut(&mut self) -> Result<&mut TableDefinition> {
        let position = self.table;
        match self.context.expression_mut(position) {
            Some(MigrationExpression::CreateTable(e)) => Ok(&mut e.table),
            _ => Err(not_a_table(position)),
        }
    }

    /// Returns the column currently being configured.
    #[must_use]
    pub fn current_column(&self) -> Option<&ColumnDefinition> {
        let index = self.current_column?;
        self.table().ok()?.columns.get(index)
    }

    /// Returns the foreign key cascade rules currently apply to.
    #[must_use]
    pub fn current_foreign_key(&self) -> Option<&ForeignKeyDefinition> {
        match self.context.expressions().get(self.current_foreign_key?) {
            Some(MigrationExpression::CreateForeignKey(e)) => Some(&e.foreign_key),
            _ => None,
        }
    }

    fn current_column_mut(&mut self, operation: &'static str) -> Result<&mut ColumnDefinition> {
        let index = self.current_column;
        let table = self.table_mut()?;
        let Some(index) = index else {
            return Err(no_current_column(&table.name, operation));
        };
        let table_name = table.name.clone();
        table.columns.get_mut(index).ok_or_else(|| {
            invalid_state(format!(
                "current column {index} is missing from table '{table_name}'"
            ))
        })
    }

    fn current_foreign_key_mut(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut ForeignKeyDefinition> {
        let Some(position) = self.current_foreign_key else {
            return Err(no_current_foreign_key(&self.table()?.name, operation));
        };
        match self.context.expression_mut(position) {
            Some(MigrationExpression::CreateForeignKey(e)) => Ok(&mut e.foreign_key),
            _ => Err(invalid_state(format!(
                "expression {position} is not a foreign key expression"
            ))),
        }
    }

    /// Places the table in `schema`.
    ///
    /// Satellite expressions already appended keep the schema they were
    /// created with, so call this before declaring columns.
    pub fn in_schema(&mut self, schema: impl Into<String>) -> Result<&mut Self> {
        self.table_mut()?.schema_name = Some(schema.into());
        Ok(self)
    }

    /// Declares a new column and makes it the current column.
    ///
    /// Columns are kept in declaration order. The new column has no foreign
    /// key yet, so cascade rules fail until one is declared on it. The
    /// returned continuation only offers type declarations, which lead back
    /// to the column options.
    pub fn with_column(&mut self, name: impl Into<String>) -> Result<ColumnTypeSyntax<'_, 'a>> {
        let table = self.table_mut()?;
        let column = ColumnDefinition::new(name, table.name.clone());
        table.columns.push(column);
        let index = table.columns.len() - 1;
        self.current_column = Some(index);
        self.current_foreign_key = None;
        Ok(ColumnTypeSyntax { builder: self })
    }

    /// Uses a database function as the column default.
    pub fn with_default(&mut self, method: SystemMethod) -> Result<&mut Self> {
        self.current_column_mut("with_default")?.default_value = DefaultValue::Method(method);
        Ok(self)
    }

    /// Uses a literal as the column default.
    pub fn with_default_value(&mut self, value: impl Into<LiteralValue>) -> Result<&mut Self> {
        self.current_column_mut("with_default_value")?.default_value =
            DefaultValue::Literal(value.into());
        Ok(self)
    }

    /// Marks the column as generated by the database on insert.
    pub fn identity(&mut self) -> Result<&mut Self> {
        self.current_column_mut("identity")?.is_identity = true;
        Ok(self)
    }

    /// Allows NULL in the column.
    pub fn nullable(&mut self) -> Result<&mut Self> {
        self.current_column_mut("nullable")?.is_nullable = true;
        Ok(self)
    }

    /// Disallows NULL in the column.
    pub fn not_nullable(&mut self) -> Result<&mut Self> {
        self.current_column_mut("not_nullable")?.is_nullable = false;
        Ok(self)
    }

    /// Indexes the column under a generated name.
    pub fn indexed(&mut self) -> Result<&mut Self> {
        self.create_index("indexed", None, false)
    }

    /// Indexes the column under `index_name`.
    pub fn indexed_named(&mut self, index_name: impl Into<String>) -> Result<&mut Self> {
        self.create_index("indexed_named", Some(index_name.into()), false)
    }

    /// Adds a unique index on the column under a generated name.
    pub fn unique(&mut self) -> Result<&mut Self> {
        self.create_index("unique", None, true)
    }

    /// Adds a unique index on the column under `index_name`.
    pub fn unique_named(&mut self, index_name: impl Into<String>) -> Result<&mut Self> {
        self.create_index("unique_named", Some(index_name.into()), true)
    }

    fn create_index(
        &mut self,
        operation: &'static str,
        name: Option<String>,
        unique: bool,
    ) -> Result<&mut Self> {
        let column = self.current_column_mut(operation)?;
        if unique {
            column.is_unique = true;
        } else {
            column.is_indexed = true;
        }
        let column_name = column.name.clone();

        let table = self.table()?;
        let index = IndexDefinition {
            name,
            schema_name: table.schema_name.clone(),
            table_name: table.name.clone(),
            is_unique: unique,
            columns: vec![column_name],
        };

        debug!(
            table = %index.table_name,
            column = %index.columns[0],
            unique,
            "Appending index expression"
        );
        self.context.append(CreateIndexExpression::new(
            self.supported_database_types.clone(),
            index,
        ));
        Ok(self)
    }

    /// Makes the column the table's primary key.
    pub fn primary_key(&mut self) -> Result<&mut Self> {
        self.create_primary_key("primary_key", None)
    }

    /// Makes the column the table's primary key, named `primary_key_name`.
    pub fn primary_key_named(&mut self, primary_key_name: impl Into<String>) -> Result<&mut Self> {
        self.create_primary_key("primary_key_named", Some(primary_key_name.into()))
    }

    fn create_primary_key(
        &mut self,
        operation: &'static str,
        name: Option<String>,
    ) -> Result<&mut Self> {
        let column = self.current_column_mut(operation)?;
        column.is_primary_key = true;
        if name.is_some() {
            column.primary_key_name.clone_from(&name);
        }
        let column_name = column.name.clone();
        let table_name = column.table_name.clone();

        let database_type = self.table()?.database_type;
        if database_type.embeds_primary_key_in_create_table() {
            debug!(
                table = %table_name,
                column = %column_name,
                dialect = %database_type,
                "Primary key is declared inline, no constraint expression"
            );
            return Ok(self);
        }

        let constraint = ConstraintDefinition {
            name,
            table_name,
            constraint_type: ConstraintType::PrimaryKey,
            columns: vec![column_name],
        };
        debug!(
            table = %constraint.table_name,
            column = %constraint.columns[0],
            dialect = %database_type,
            "Appending primary key constraint expression"
        );
        self.context.append(CreateConstraintExpression::new(
            self.supported_database_types.clone(),
            constraint,
        ));
        Ok(self)
    }

    /// Flags the column as a foreign key without creating a constraint.
    ///
    /// The foreign key itself is expected to be added separately.
    pub fn mark_foreign_key(&mut self) -> Result<&mut Self> {
        self.current_column_mut("mark_foreign_key")?.is_foreign_key = true;
        Ok(self)
    }

    /// Makes the column reference `primary_table.primary_column`.
    pub fn foreign_key(
        &mut self,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Result<&mut Self> {
        self.create_foreign_key("foreign_key", None, None, primary_table, primary_column)
    }

    /// Makes the column reference `primary_table.primary_column` through a
    /// foreign key named `foreign_key_name`.
    pub fn foreign_key_named(
        &mut self,
        foreign_key_name: impl Into<String>,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Result<&mut Self> {
        self.create_foreign_key(
            "foreign_key_named",
            Some(foreign_key_name.into()),
            None,
            primary_table,
            primary_column,
        )
    }

    /// Makes the column reference `primary_schema.primary_table.primary_column`
    /// through a foreign key named `foreign_key_name`.
    pub fn foreign_key_in_schema(
        &mut self,
        foreign_key_name: impl Into<String>,
        primary_schema: impl Into<String>,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Result<&mut Self> {
        self.create_foreign_key(
            "foreign_key_in_schema",
            Some(foreign_key_name.into()),
            Some(primary_schema.into()),
            primary_table,
            primary_column,
        )
    }

    fn create_foreign_key(
        &mut self,
        operation: &'static str,
        name: Option<String>,
        primary_schema: Option<String>,
        primary_table: impl Into<String>,
        primary_column: impl Into<String>,
    ) -> Result<&mut Self> {
        let column = self.current_column_mut(operation)?;
        column.is_foreign_key = true;
        let column_name = column.name.clone();

        let table = self.table()?;
        let mut foreign_key = ForeignKeyDefinition::new(primary_table, table.name.clone());
        foreign_key.name = name;
        foreign_key.primary_table_schema = primary_schema;
        foreign_key.foreign_table_schema = table.schema_name.clone();
        foreign_key.add_column_pair(primary_column, column_name);

        self.append_foreign_key(foreign_key);
        Ok(self)
    }

    /// Declares that `foreign_table.foreign_column` references this column.
    pub fn referenced_by(
        &mut self,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Result<&mut Self> {
        self.create_reference("referenced_by", None, None, foreign_table, foreign_column)
    }

    /// Declares that `foreign_table.foreign_column` references this column
    /// through a foreign key named `foreign_key_name`.
    pub fn referenced_by_named(
        &mut self,
        foreign_key_name: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Result<&mut Self> {
        self.create_reference(
            "referenced_by_named",
            Some(foreign_key_name.into()),
            None,
            foreign_table,
            foreign_column,
        )
    }

    /// Declares that `foreign_schema.foreign_table.foreign_column` references
    /// this column through a foreign key named `foreign_key_name`.
    pub fn referenced_by_in_schema(
        &mut self,
        foreign_key_name: impl Into<String>,
        foreign_schema: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Result<&mut Self> {
        self.create_reference(
            "referenced_by_in_schema",
            Some(foreign_key_name.into()),
            Some(foreign_schema.into()),
            foreign_table,
            foreign_column,
        )
    }

    fn create_reference(
        &mut self,
        operation: &'static str,
        name: Option<String>,
        foreign_schema: Option<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Result<&mut Self> {
        let column_name = self.current_column_mut(operation)?.name.clone();

        let table = self.table()?;
        let mut foreign_key = ForeignKeyDefinition::new(table.name.clone(), foreign_table);
        foreign_key.name = name;
        foreign_key.primary_table_schema = table.schema_name.clone();
        foreign_key.foreign_table_schema = foreign_schema;
        foreign_key.add_column_pair(column_name, foreign_column);

        self.append_foreign_key(foreign_key);
        Ok(self)
    }

    fn append_foreign_key(&mut self, foreign_key: ForeignKeyDefinition) {
        debug!(
            primary_table = %foreign_key.primary_table,
            foreign_table = %foreign_key.foreign_table,
            primary_column = %foreign_key.primary_columns()[0],
            foreign_column = %foreign_key.foreign_columns()[0],
            "Appending foreign key expression"
        );
        let position = self.context.append(CreateForeignKeyExpression::new(
            self.supported_database_types.clone(),
            foreign_key,
        ));
        self.current_foreign_key = Some(position);
    }

    /// Sets the ON DELETE rule of the current foreign key.
    pub fn on_delete(&mut self, rule: Rule) -> Result<&mut Self> {
        self.current_foreign_key_mut("on_delete")?.on_delete = rule;
        Ok(self)
    }

    /// Sets the ON UPDATE rule of the current foreign key.
    pub fn on_update(&mut self, rule: Rule) -> Result<&mut Self> {
        self.current_foreign_key_mut("on_update")?.on_update = rule;
        Ok(self)
    }

    /// Sets both the ON DELETE and ON UPDATE rules of the current foreign key.
    pub fn on_delete_or_update(&mut self, rule: Rule) -> Result<&mut Self> {
        let foreign_key = self.current_foreign_key_mut("on_delete_or_update")?;
        foreign_key.on_delete = rule;
        foreign_key.on_update = rule;
        Ok(self)
    }
}

/// Continuation returned by [`CreateTableBuilder::with_column`].
///
/// Only type declarations are available here; each one records the type on
/// the new column and hands back the table builder.
#[derive(Debug)]
pub struct ColumnTypeSyntax<'b, 'a> {
    builder: &'b mut CreateTableBuilder<'a>,
}

impl<'b, 'a> ColumnTypeSyntax<'b, 'a> {
    /// Declares the column type.
    pub fn as_type(self, column_type: ColumnType) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.builder.current_column_mut("as_type")?.column_type = Some(column_type);
        Ok(self.builder)
    }

    /// Declares a 16-bit integer column.
    pub fn as_int16(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Int16)
    }

    /// Declares a 32-bit integer column.
    pub fn as_int32(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Int32)
    }

    /// Declares a 64-bit integer column.
    pub fn as_int64(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Int64)
    }

    /// Declares a boolean column.
    pub fn as_boolean(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Boolean)
    }

    /// Declares a string column with the dialect's default length.
    pub fn as_string(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::String(None))
    }

    /// Declares a string column of at most `size` characters.
    pub fn as_string_sized(self, size: usize) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::String(Some(size)))
    }

    /// Declares an unbounded text column.
    pub fn as_text(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Text)
    }

    /// Declares a date and time column.
    pub fn as_date_time(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::DateTime)
    }

    /// Declares a GUID column.
    pub fn as_guid(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Guid)
    }

    /// Declares a decimal column.
    pub fn as_decimal(self, precision: u8, scale: u8) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Decimal(precision, scale))
    }

    /// Declares a double precision column.
    pub fn as_double(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Double)
    }

    /// Declares a binary column.
    pub fn as_binary(self) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Binary)
    }

    /// Declares a column with a verbatim type name.
    pub fn as_custom(self, type_name: impl Into<String>) -> Result<&'b mut CreateTableBuilder<'a>> {
        self.as_type(ColumnType::Custom(type_name.into()))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` with a subscriber writing plain-text logs into the result.
    fn with_captured_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs.contents()
    }

    fn only_table(context: &MigrationContext) -> &TableDefinition {
        match &context.expressions()[0] {
            MigrationExpression::CreateTable(e) => &e.table,
            _ => panic!("Expected CreateTable"),
        }
    }

    #[test]
    fn test_current_column_tracks_latest_declaration() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer);
        let mut table = context.create_table("users");
        assert!(table.current_column().is_none());

        table.with_column("id").unwrap().as_int32().unwrap();
        table.with_column("name").unwrap().as_string().unwrap();
        assert_eq!(table.current_column().unwrap().name, "name");

        table.with_column("email").unwrap().as_string().unwrap();
        assert_eq!(table.current_column().unwrap().name, "email");

        let names: Vec<&str> = only_table(&context)
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "name", "email"]);
    }

    #[test]
    fn test_column_options_apply_to_current_column() {
        let mut context = MigrationContext::new(DatabaseType::MySql);
        {
            let mut table = context.create_table("users");
            table
                .with_column("id")
                .unwrap()
                .as_int32()
                .unwrap()
                .identity()
                .unwrap();
            table
                .with_column("created")
                .unwrap()
                .as_date_time()
                .unwrap()
                .with_default(SystemMethod::CurrentUtcDateTime)
                .unwrap();
            table
                .with_column("status")
                .unwrap()
                .as_string_sized(20)
                .unwrap()
                .with_default_value("draft")
                .unwrap();
        }

        let table = only_table(&context);
        assert!(table.columns[0].is_identity);
        assert_eq!(table.columns[0].column_type, Some(ColumnType::Int32));
        assert_eq!(
            table.columns[1].default_value,
            DefaultValue::Method(SystemMethod::CurrentUtcDateTime)
        );
        assert_eq!(
            table.columns[2].default_value,
            DefaultValue::Literal(LiteralValue::String("draft".to_string()))
        );
        assert_eq!(table.columns[2].column_type, Some(ColumnType::String(Some(20))));
        assert!(!table.columns[1].is_identity);
    }

    #[test]
    fn test_nullability_last_call_wins() {
        let mut context = MigrationContext::new(DatabaseType::Sqlite);
        {
            let mut table = context.create_table("users");
            table
                .with_column("bio")
                .unwrap()
                .as_text()
                .unwrap()
                .nullable()
                .unwrap()
                .not_nullable()
                .unwrap()
                .nullable()
                .unwrap();
        }
        assert!(only_table(&context).columns[0].is_nullable);
    }

    #[test]
    fn test_options_before_column_fail() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer);
        let mut table = context.create_table("users");

        assert!(matches!(
            table.identity(),
            Err(MigrateError::NoCurrentColumn {
                operation: "identity"
            })
        ));
        assert!(matches!(
            table.primary_key(),
            Err(MigrateError::NoCurrentColumn { .. })
        ));
        assert!(matches!(
            table.foreign_key("users", "id"),
            Err(MigrateError::NoCurrentColumn { .. })
        ));
        assert!(matches!(
            table.with_default_value(1_i64),
            Err(MigrateError::NoCurrentColumn { .. })
        ));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_cascade_rules_before_foreign_key_fail() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer);
        let mut table = context.create_table("posts");
        table.with_column("author_id").unwrap().as_int32().unwrap();

        assert!(matches!(
            table.on_delete(Rule::Cascade),
            Err(MigrateError::NoCurrentForeignKey {
                operation: "on_delete"
            })
        ));
        assert!(matches!(
            table.on_update(Rule::Cascade),
            Err(MigrateError::NoCurrentForeignKey { .. })
        ));
        assert!(matches!(
            table.on_delete_or_update(Rule::SetNull),
            Err(MigrateError::NoCurrentForeignKey { .. })
        ));
    }

    #[test]
    fn test_mark_foreign_key_only_flags_column() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer);
        {
            let mut table = context.create_table("posts");
            table
                .with_column("author_id")
                .unwrap()
                .as_int32()
                .unwrap()
                .mark_foreign_key()
                .unwrap();
            assert!(table.current_foreign_key().is_none());
            assert!(matches!(
                table.on_delete(Rule::Cascade),
                Err(MigrateError::NoCurrentForeignKey { .. })
            ));
        }
        assert_eq!(context.len(), 1);
        assert!(only_table(&context).columns[0].is_foreign_key);
    }

    #[test]
    fn test_builder_on_non_table_expression_fails() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer);
        let position = context.append(CreateIndexExpression::new(
            Vec::new(),
            IndexDefinition {
                name: None,
                schema_name: None,
                table_name: "users".to_string(),
                is_unique: false,
                columns: vec!["id".to_string()],
            },
        ));

        let mut table = CreateTableBuilder::new(&mut context, position);
        assert!(matches!(
            table.with_column("id"),
            Err(MigrateError::InvalidState(_))
        ));
        assert!(table.table().is_err());
    }

    #[test]
    fn test_invalid_state_is_logged() {
        let logs = with_captured_logs(|| {
            let mut context = MigrationContext::new(DatabaseType::SqlServer);
            let position = context.append(CreateIndexExpression::new(
                Vec::new(),
                IndexDefinition {
                    name: None,
                    schema_name: None,
                    table_name: "users".to_string(),
                    is_unique: false,
                    columns: vec!["id".to_string()],
                },
            ));
            let mut table = CreateTableBuilder::new(&mut context, position);
            assert!(table.with_column("id").is_err());
        });

        assert!(logs.contains("WARN"));
        assert!(logs.contains("expression 0 is not a CREATE TABLE expression"));
    }

    #[test]
    fn test_stale_pointers_are_logged() {
        let logs = with_captured_logs(|| {
            let mut context = MigrationContext::new(DatabaseType::SqlServer);
            let mut table = context.create_table("posts");
            table.with_column("author_id").unwrap().as_int32().unwrap();

            table.current_foreign_key = Some(0);
            assert!(matches!(
                table.on_delete(Rule::Cascade),
                Err(MigrateError::InvalidState(_))
            ));

            table.current_column = Some(5);
            assert!(matches!(
                table.identity(),
                Err(MigrateError::InvalidState(_))
            ));
        });

        assert!(logs.contains("expression 0 is not a foreign key expression"));
        assert!(logs.contains("current column 5 is missing from table 'posts'"));
        assert_eq!(logs.matches("WARN").count(), 2);
    }

    #[test]
    fn test_in_schema_scopes_satellites() {
        let mut context = MigrationContext::new(DatabaseType::PostgreSql);
        {
            let mut table = context.create_table("posts");
            table.in_schema("blog").unwrap();
            table
                .with_column("slug")
                .unwrap()
                .as_string()
                .unwrap()
                .indexed()
                .unwrap();
            table
                .with_column("author_id")
                .unwrap()
                .as_int32()
                .unwrap()
                .foreign_key("users", "id")
                .unwrap();
        }

        assert_eq!(only_table(&context).schema_name.as_deref(), Some("blog"));
        match &context.expressions()[1] {
            MigrationExpression::CreateIndex(e) => {
                assert_eq!(e.index.schema_name.as_deref(), Some("blog"));
            }
            _ => panic!("Expected CreateIndex"),
        }
        match &context.expressions()[2] {
            MigrationExpression::CreateForeignKey(e) => {
                assert_eq!(e.foreign_key.foreign_table_schema.as_deref(), Some("blog"));
                assert_eq!(e.foreign_key.primary_table_schema, None);
            }
            _ => panic!("Expected CreateForeignKey"),
        }
    }

    #[test]
    fn test_satellites_inherit_supported_databases() {
        let mut context = MigrationContext::new(DatabaseType::SqlServer)
            .with_supported_database_types(&[DatabaseType::SqlServer]);
        {
            let mut table = context.create_table("users");
            table
                .with_column("id")
                .unwrap()
                .as_int32()
                .unwrap()
                .primary_key()
                .unwrap();
        }

        for expression in context.expressions() {
            assert_eq!(
                expression.supported_database_types(),
                &[DatabaseType::SqlServer]
            );
        }
        assert_eq!(context.expressions_for(DatabaseType::MySql).count(), 0);
    }
}
