//! Paginated result controller.
//!
//! The controller is a single-slot pipeline: every destructive action (select
//! table, sort, filter, cancel) advances the epoch, and a page result is
//! applied only if its request epoch is still current when it completes.
//! Several fetches may be physically in flight at once, but at most one of
//! them ever mutates visible state.
//!
//! Load-more requests are tagged with the current epoch without advancing
//! it. They are serialized by the `is_loading_more` flag and discarded if a
//! destructive action happens while they are outstanding.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::chunk::next_chunk_size;
use crate::config::PagingConfig;
use crate::epoch::Epoch;
use crate::error::FetchError;
use crate::source::{DataSource, PageRequest, PageResult, SortDirection, SortSpec};
use crate::state::ControllerState;

/// What happened to a controller action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The page was merged into state.
    Applied { rows: usize },
    /// A newer action started before the page arrived; it was dropped.
    Superseded,
    /// Nothing to fetch (no table, no more rows, or a load already running).
    Skipped,
}

/// Drives paging of one browsed table against a data source.
pub struct PaginationController<S: DataSource + ?Sized> {
    source: Arc<S>,
    config: PagingConfig,
    state: Mutex<ControllerState>,
}

impl<S: DataSource + ?Sized> PaginationController<S> {
    /// Create an idle controller.
    pub fn new(source: Arc<S>, config: PagingConfig) -> Self {
        let state = ControllerState::new(config.starting_chunk_size(), Epoch::ZERO);
        Self {
            source,
            config,
            state: Mutex::new(state),
        }
    }

    /// The data source this controller fetches from.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> ControllerState {
        self.state.lock().clone()
    }

    pub fn current_epoch(&self) -> Epoch {
        self.state.lock().current_epoch
    }

    pub fn active_table(&self) -> Option<String> {
        self.state.lock().active_table.clone()
    }

    /// Select a table and load its first page. Sort, filter and chunk size
    /// start over.
    pub async fn select_table(&self, table: impl Into<String>) -> Result<LoadOutcome, FetchError> {
        let table = table.into();
        tracing::debug!(table = %table, "selecting table");

        let pending = {
            let mut state = self.state.lock();
            let epoch = state.current_epoch;
            *state = ControllerState::new(self.config.starting_chunk_size(), epoch);
            state.active_table = Some(table);
            self.begin_reload(&mut state)
        };
        self.finish_reload(pending).await
    }

    /// Sort by `column` and reload from the first page.
    pub async fn apply_sort(
        &self,
        column: impl Into<String>,
        direction: SortDirection,
    ) -> Result<LoadOutcome, FetchError> {
        let sort = SortSpec {
            column: column.into(),
            direction,
        };
        let pending = {
            let mut state = self.state.lock();
            state.sort = Some(sort);
            self.begin_reload(&mut state)
        };
        self.finish_reload(pending).await
    }

    /// Drop the sort and reload from the first page.
    pub async fn clear_sort(&self) -> Result<LoadOutcome, FetchError> {
        let pending = {
            let mut state = self.state.lock();
            state.sort = None;
            self.begin_reload(&mut state)
        };
        self.finish_reload(pending).await
    }

    /// Filter with a compiled WHERE clause body and reload from the first page.
    pub async fn apply_filter(
        &self,
        where_clause: impl Into<String>,
    ) -> Result<LoadOutcome, FetchError> {
        let where_clause = where_clause.into();
        let pending = {
            let mut state = self.state.lock();
            state.where_clause = Some(where_clause);
            self.begin_reload(&mut state)
        };
        self.finish_reload(pending).await
    }

    /// Drop the filter and reload from the first page.
    pub async fn clear_filter(&self) -> Result<LoadOutcome, FetchError> {
        let pending = {
            let mut state = self.state.lock();
            state.where_clause = None;
            self.begin_reload(&mut state)
        };
        self.finish_reload(pending).await
    }

    /// Append the next page. A no-op unless a table is selected, more rows
    /// exist and no other load-more is outstanding.
    pub async fn load_more_rows(&self) -> Result<LoadOutcome, FetchError> {
        let (table, request) = {
            let mut state = self.state.lock();
            let table = match &state.active_table {
                Some(table) if state.has_more && !state.is_loading_more => table.clone(),
                _ => return Ok(LoadOutcome::Skipped),
            };
            state.is_loading_more = true;
            let request = self.request_for(&state, state.offset);
            (table, request)
        };
        let flight = InFlight::new(&self.state, request.request_epoch, Flight::LoadMore);

        tracing::debug!(
            table = %table,
            epoch = %request.request_epoch,
            offset = request.offset,
            limit = request.limit,
            "loading more rows"
        );
        let result = self.source.fetch_page(&table, &request).await;
        flight.disarm();

        let mut state = self.state.lock();
        if state.current_epoch != request.request_epoch {
            tracing::trace!(
                stale = %request.request_epoch,
                current = %state.current_epoch,
                "discarding superseded page"
            );
            return Ok(LoadOutcome::Superseded);
        }
        state.is_loading_more = false;

        match result {
            Ok(page) => {
                let count = page.rows.len();
                state.rows.extend(page.rows);
                state.offset += count as u64;
                state.total_count = page.total_count;
                state.has_more = page.has_more;
                Ok(LoadOutcome::Applied { rows: count })
            }
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "failed to load more rows");
                Err(e)
            }
        }
    }

    /// Orphan every outstanding request. The underlying fetches are not
    /// aborted; their results are discarded when they arrive.
    pub fn cancel_query(&self) -> Epoch {
        let mut state = self.state.lock();
        state.current_epoch = state.current_epoch.next();
        state.is_loading = false;
        state.is_loading_more = false;
        tracing::debug!(epoch = %state.current_epoch, "query cancelled");
        state.current_epoch
    }

    /// Return to idle, discarding rows and any outstanding results.
    pub fn close(&self) {
        let mut state = self.state.lock();
        let epoch = state.current_epoch.next();
        *state = ControllerState::new(self.config.starting_chunk_size(), epoch);
    }

    /// Advance the epoch and clear rows. Returns the request to issue, or
    /// `None` when no table is selected.
    fn begin_reload(&self, state: &mut ControllerState) -> Option<(String, PageRequest)> {
        state.current_epoch = state.current_epoch.next();
        state.clear_rows();
        state.is_loading_more = false;

        let Some(table) = state.active_table.clone() else {
            state.is_loading = false;
            return None;
        };
        state.is_loading = true;
        Some((table, self.request_for(state, 0)))
    }

    async fn finish_reload(
        &self,
        pending: Option<(String, PageRequest)>,
    ) -> Result<LoadOutcome, FetchError> {
        let Some((table, request)) = pending else {
            return Ok(LoadOutcome::Skipped);
        };

        tracing::debug!(
            table = %table,
            epoch = %request.request_epoch,
            limit = request.limit,
            sort = ?request.order_by,
            filter = ?request.where_clause,
            "fetching first page"
        );
        let flight = InFlight::new(&self.state, request.request_epoch, Flight::Reload);
        let result = self.source.fetch_page(&table, &request).await;
        flight.disarm();

        let mut state = self.state.lock();
        if state.current_epoch != request.request_epoch {
            tracing::trace!(
                stale = %request.request_epoch,
                current = %state.current_epoch,
                "discarding superseded page"
            );
            return Ok(LoadOutcome::Superseded);
        }
        state.is_loading = false;

        match result {
            Ok(page) => Ok(self.apply_first_page(&mut state, page)),
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "failed to load rows");
                Err(e)
            }
        }
    }

    fn apply_first_page(&self, state: &mut ControllerState, page: PageResult) -> LoadOutcome {
        let count = page.rows.len();
        state.columns = page.columns;
        state.rows = page.rows;
        state.offset = count as u64;
        state.total_count = page.total_count;
        state.has_more = page.has_more;
        state.chunk_size = next_chunk_size(&self.config, page.total_count);
        LoadOutcome::Applied { rows: count }
    }

    fn request_for(&self, state: &ControllerState, offset: u64) -> PageRequest {
        PageRequest {
            request_epoch: state.current_epoch,
            limit: state.chunk_size,
            offset,
            order_by: state.sort.as_ref().map(|s| s.column.clone()),
            order_direction: state.sort.as_ref().map(|s| s.direction),
            where_clause: state.where_clause.clone(),
            timeout_seconds: self.config.timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Flight {
    Reload,
    LoadMore,
}

/// Clears a loading flag if the fetch future is dropped before it completes,
/// as happens when an HTTP client disconnects mid-request. Only the flag set
/// for `epoch` is touched; a newer action owns the flags once the epoch moves.
struct InFlight<'a> {
    state: &'a Mutex<ControllerState>,
    epoch: Epoch,
    kind: Flight,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<ControllerState>, epoch: Epoch, kind: Flight) -> Self {
        Self {
            state,
            epoch,
            kind,
            armed: true,
        }
    }

    /// The fetch completed; the caller applies or discards the result itself.
    /// Must be called before the caller takes the state lock.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if state.current_epoch != self.epoch {
            return;
        }
        tracing::debug!(
            epoch = %self.epoch,
            kind = ?self.kind,
            "fetch abandoned before completion"
        );
        match self.kind {
            Flight::Reload => state.is_loading = false,
            Flight::LoadMore => state.is_loading_more = false,
        }
    }
}
