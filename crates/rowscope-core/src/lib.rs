//! rowscope core
//!
//! The paginated result controller behind the table browser. It turns
//! navigation events (select table, sort, filter, scroll) into bounded page
//! requests against a [`DataSource`], applying only the result of the most
//! recently issued request.
//!
//! - [`chunk`] - adaptive page sizing from the observed row count
//! - [`epoch`] - request fencing tokens
//! - [`source`] - the `DataSource` / `ColumnMetadata` collaborator traits
//! - [`controller`] - the pagination state machine

pub mod chunk;
pub mod config;
pub mod controller;
pub mod epoch;
pub mod error;
pub mod source;
pub mod state;

pub use chunk::advise_chunk_size;
pub use config::PagingConfig;
pub use controller::{LoadOutcome, PaginationController};
pub use epoch::Epoch;
pub use error::FetchError;
pub use source::{
    ColumnMetadata, DataSource, PageRequest, PageResult, Record, SortDirection, SortSpec,
};
pub use state::{ControllerState, Phase};

pub use rowscope_filter::ColumnDescriptor;
