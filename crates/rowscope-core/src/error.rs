//! Fetch error types.

use thiserror::Error;

/// A failed page fetch, as reported by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The data source could not be reached or the call was lost.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The data source rejected or failed the query.
    #[error("query error: {0}")]
    BackendQuery(String),

    /// The query did not finish within the requested timeout.
    #[error("query timed out after {0}s")]
    Timeout(u64),
}

impl FetchError {
    /// Stable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::TransportFailure(_) => "TRANSPORT_FAILURE",
            FetchError::BackendQuery(_) => "BACKEND_QUERY_ERROR",
            FetchError::Timeout(_) => "TIMEOUT",
        }
    }
}
