//! Paging configuration.

use std::time::Duration;

/// Page size used before the first page reports a row count.
pub const DEFAULT_INITIAL_CHUNK_SIZE: u32 = 500;

/// Default per-request timeout handed to the data source.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct PagingConfig {
    /// Page size for the first request after selecting a table.
    pub initial_chunk_size: u32,

    /// Fixed page size. When set, adaptive sizing is bypassed entirely.
    pub chunk_size_override: Option<u32>,

    /// Timeout passed through to the data source with every request.
    pub query_timeout: Option<Duration>,
}

impl PagingConfig {
    /// Create a configuration with adaptive sizing and the default timeout.
    pub fn new() -> Self {
        Self {
            initial_chunk_size: DEFAULT_INITIAL_CHUNK_SIZE,
            chunk_size_override: None,
            query_timeout: Some(DEFAULT_QUERY_TIMEOUT),
        }
    }

    /// Set the page size used before any row count is known.
    pub fn with_initial_chunk_size(mut self, size: u32) -> Self {
        self.initial_chunk_size = size.max(1);
        self
    }

    /// Always use `size` rows per page.
    pub fn with_fixed_chunk_size(mut self, size: u32) -> Self {
        self.chunk_size_override = Some(size.max(1));
        self
    }

    /// Set the request timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Let the data source wait indefinitely.
    pub fn without_query_timeout(mut self) -> Self {
        self.query_timeout = None;
        self
    }

    /// Page size for a freshly selected table.
    pub fn starting_chunk_size(&self) -> u32 {
        self.chunk_size_override.unwrap_or(self.initial_chunk_size)
    }

    /// Timeout in whole seconds, as sent on the wire.
    pub fn timeout_seconds(&self) -> Option<u64> {
        self.query_timeout.map(|t| t.as_secs().max(1))
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new()
    }
}
