//! SQLite data source.
//!
//! Serves pages of a SQLite database to the pagination controller. Queries
//! run on the blocking thread pool; a query that outlives the request's
//! timeout is interrupted and reported as [`FetchError::Timeout`].
//!
//! WHERE clauses arrive precompiled (see `rowscope_filter::Sqlite`) and are
//! embedded verbatim, so callers must only pass compiler output.

mod error;
mod source;
mod value;

pub use error::SourceError;
pub use source::{SqliteSource, TableSummary};
pub use value::cell_to_json;

pub use rowscope_core::FetchError;
