//! Errors raised while querying SQLite.

use rowscope_core::FetchError;
use thiserror::Error;

/// SQLite source error.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no such table: {0}")]
    NoSuchTable(String),

    #[error("query abandoned before it started")]
    Abandoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl From<SourceError> for FetchError {
    fn from(e: SourceError) -> Self {
        FetchError::BackendQuery(e.to_string())
    }
}
