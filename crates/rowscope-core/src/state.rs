//! Controller state.

use serde::Serialize;

use crate::epoch::Epoch;
use crate::source::{Record, SortSpec};

/// Coarse state machine position, derived from the loading flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No table selected.
    Idle,
    /// First page (or a refetch after sort/filter) in flight.
    Loading,
    /// Appending the next page.
    LoadingMore,
    /// Rows displayed, nothing in flight.
    Ready,
}

/// Everything the controller knows about the browsed table.
///
/// Also serves as the snapshot handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
    pub active_table: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
    pub total_count: u64,
    /// Rows merged into `rows` so far.
    pub offset: u64,
    pub has_more: bool,
    pub chunk_size: u32,
    pub current_epoch: Epoch,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub sort: Option<SortSpec>,
    pub where_clause: Option<String>,
}

impl ControllerState {
    /// Fresh state with no table selected.
    pub fn new(chunk_size: u32, epoch: Epoch) -> Self {
        Self {
            active_table: None,
            columns: Vec::new(),
            rows: Vec::new(),
            total_count: 0,
            offset: 0,
            has_more: false,
            chunk_size,
            current_epoch: epoch,
            is_loading: false,
            is_loading_more: false,
            sort: None,
            where_clause: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.is_loading_more {
            Phase::LoadingMore
        } else if self.active_table.is_none() {
            Phase::Idle
        } else {
            Phase::Ready
        }
    }

    /// Drop all loaded rows ahead of a refetch.
    pub(crate) fn clear_rows(&mut self) {
        self.rows.clear();
        self.offset = 0;
        self.total_count = 0;
        self.has_more = false;
    }
}
