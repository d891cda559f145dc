//! Data source collaborator traits and their request/response types.

use async_trait::async_trait;
use rowscope_filter::ColumnDescriptor;
use serde::{Deserialize, Serialize};

use crate::epoch::Epoch;
use crate::error::FetchError;

/// One row: cell values in the order of [`PageResult::columns`].
pub type Record = Vec<serde_json::Value>;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    #[serde(alias = "asc")]
    Asc,
    /// Descending order.
    #[serde(alias = "desc")]
    Desc,
}

impl SortDirection {
    /// SQL keyword.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Active sort of the browsed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// A bounded fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Controller epoch the request was issued under.
    pub request_epoch: Epoch,
    pub limit: u32,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<SortDirection>,
    /// WHERE clause body, without the `WHERE` keyword.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    /// The data source is responsible for enforcing this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// One page of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    /// Rows matching the request's filter, across all pages.
    pub total_count: u64,
    pub has_more: bool,
}

/// A tabular data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch one page of `table`.
    async fn fetch_page(&self, table: &str, request: &PageRequest)
        -> Result<PageResult, FetchError>;
}

/// Column type lookup, used to decide on binary UUID literals.
#[async_trait]
pub trait ColumnMetadata: Send + Sync {
    /// Columns of `table` with their declared types.
    async fn get_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_serde() {
        let d: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(d, SortDirection::Desc);
        let d: SortDirection = serde_json::from_str("\"ASC\"").unwrap();
        assert_eq!(d, SortDirection::Asc);
        assert_eq!(serde_json::to_string(&SortDirection::Desc).unwrap(), "\"DESC\"");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_page_request_skips_empty_fields() {
        let request = PageRequest {
            request_epoch: Epoch::ZERO.next(),
            limit: 500,
            offset: 0,
            order_by: None,
            order_direction: None,
            where_clause: None,
            timeout_seconds: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"requestEpoch": 1, "limit": 500, "offset": 0})
        );
    }
}
