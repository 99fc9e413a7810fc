//! Example: Blog Tables
//!
//! Builds the tables of a small blog for the database named on the command
//! line (SQL Server by default) and prints the resulting expressions.
//!
//! Run with: cargo run --example blog_tables -p oxide-ddl -- mysql

use oxide_ddl::prelude::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn build(context: &mut MigrationContext) -> Result<()> {
    {
        let mut users = context.create_table("users");
        users.with_column("id")?.as_int32()?.identity()?.primary_key()?;
        users
            .with_column("username")?
            .as_string_sized(100)?
            .not_nullable()?
            .unique()?;
        users
            .with_column("email")?
            .as_string_sized(255)?
            .not_nullable()?
            .indexed_named("ix_users_email")?;
        users
            .with_column("is_active")?
            .as_boolean()?
            .not_nullable()?
            .with_default_value(true)?;
        users
            .with_column("created_at")?
            .as_date_time()?
            .not_nullable()?
            .with_default(SystemMethod::CurrentUtcDateTime)?;
    }

    {
        let mut posts = context.create_table("posts");
        posts
            .with_column("id")?
            .as_int32()?
            .identity()?
            .primary_key_named("pk_posts")?;
        posts
            .with_column("author_id")?
            .as_int32()?
            .not_nullable()?
            .foreign_key_named("fk_posts_users", "users", "id")?
            .on_delete(Rule::Cascade)?;
        posts.with_column("title")?.as_string_sized(200)?.not_nullable()?;
        posts.with_column("body")?.as_text()?.nullable()?;
    }

    {
        let mut comments = context.create_table("comments");
        comments
            .with_column("id")?
            .as_int32()?
            .identity()?
            .primary_key()?
            .referenced_by("comment_flags", "comment_id")?
            .on_delete_or_update(Rule::Cascade)?;
        comments
            .with_column("post_id")?
            .as_int32()?
            .foreign_key("posts", "id")?
            .on_delete(Rule::Cascade)?;
    }

    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database_type = match std::env::args().nth(1) {
        Some(name) => name.parse::<DatabaseType>()?,
        None => DatabaseType::SqlServer,
    };

    let mut context = MigrationContext::new(database_type);
    build(&mut context)?;

    println!("Expressions for {database_type}:");
    for (i, expression) in context.expressions().iter().enumerate() {
        println!("  {}. {}", i + 1, expression.description());
    }

    println!("\n{}", context.to_json()?);
    Ok(())
}
