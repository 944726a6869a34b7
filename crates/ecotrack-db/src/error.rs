use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("failed to read schema file {}: {source}", .path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid database name {0:?}")]
    InvalidDatabaseName(String),
}
