//! Error types for the table builder and migration context.

/// Errors that can occur while building migration expressions.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A column option was used before any column was declared.
    #[error("Cannot apply '{operation}': no column has been declared with with_column")]
    NoCurrentColumn {
        /// The builder call that required a current column.
        operation: &'static str,
    },

    /// A cascade rule was set before any foreign key was declared.
    #[error("Cannot apply '{operation}': no foreign key has been declared on this table")]
    NoCurrentForeignKey {
        /// The builder call that required a current foreign key.
        operation: &'static str,
    },

    /// The builder state no longer matches the context contents.
    #[error("Invalid builder state: {0}")]
    InvalidState(String),

    /// A database type name could not be recognized.
    #[error("Unknown database type: {0}")]
    UnknownDatabaseType(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
