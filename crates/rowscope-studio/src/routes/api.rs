use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use rowscope_core::{
    ColumnMetadata, ControllerState, Epoch, LoadOutcome, Phase, SortDirection, SortSpec,
};
use rowscope_filter::{compile_for, ColumnDescriptor, Sqlite};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, StudioError};
use crate::session::Session;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Session management
        .route("/api/session", post(create_session))
        .route("/api/session/:id", get(get_session).delete(delete_session))
        .route("/api/sessions", get(list_sessions))
        // Tables
        .route("/api/tables", get(list_tables))
        .route("/api/tables/:table/columns", get(table_columns))
        // Browsing
        .route("/api/session/:id/table", post(select_table))
        .route("/api/session/:id/sort", post(apply_sort).delete(clear_sort))
        .route("/api/session/:id/filter", post(apply_filter).delete(clear_filter))
        .route("/api/session/:id/more", post(load_more))
        .route("/api/session/:id/cancel", post(cancel_query))
        .route("/api/session/:id/rows", get(get_rows))
        // Filter preview
        .route("/api/filter/preview", post(preview_filter))
}

// ============================================================================
// Session Management
// ============================================================================

#[derive(Serialize)]
struct SessionResponse {
    success: bool,
    session: SessionInfo,
}

#[derive(Serialize)]
struct SessionInfo {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    age_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    browse: Option<BrowseState>,
}

async fn create_session(State(state): State<AppState>) -> Result<Json<SessionResponse>> {
    let session = state.sessions.create_session()?;

    Ok(Json(SessionResponse {
        success: true,
        session: SessionInfo {
            id: session.id.clone(),
            age_secs: Some(0),
            browse: None,
        },
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let session = state.sessions.require(&id)?;

    Ok(Json(SessionResponse {
        success: true,
        session: SessionInfo {
            id: session.id.clone(),
            age_secs: Some(session.age().as_secs()),
            browse: Some(BrowseState::from(&session.controller.snapshot())),
        },
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let deleted = state.sessions.delete_session(&id);

    if deleted {
        Ok(Json(json!({
            "success": true,
            "message": "Session deleted"
        })))
    } else {
        Err(StudioError::SessionNotFound(id))
    }
}

async fn list_sessions(State(state): State<AppState>) -> Json<Value> {
    let sessions = state.sessions.list_sessions();

    Json(json!({
        "success": true,
        "sessions": sessions,
        "count": sessions.len(),
        "max": state.config.max_sessions,
    }))
}

// ============================================================================
// Tables
// ============================================================================

async fn list_tables(State(state): State<AppState>) -> Result<Json<Value>> {
    let tables = state
        .source
        .list_tables(state.config.paging.timeout_seconds())
        .await?;

    Ok(Json(json!({
        "success": true,
        "tables": tables,
        "count": tables.len(),
    })))
}

async fn table_columns(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<Json<Value>> {
    let columns = columns_of(&state, &table).await?;

    Ok(Json(json!({
        "success": true,
        "table": table,
        "columns": columns,
    })))
}

async fn columns_of(state: &AppState, table: &str) -> Result<Vec<ColumnDescriptor>> {
    if !state.source.has_table(table).await? {
        return Err(StudioError::TableNotFound(table.to_string()));
    }
    Ok(state.source.get_columns(table).await?)
}

// ============================================================================
// Browsing
// ============================================================================

/// Controller state without the row payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrowseState {
    phase: Phase,
    active_table: Option<String>,
    columns: Vec<String>,
    loaded_rows: u64,
    total_count: u64,
    has_more: bool,
    chunk_size: u32,
    epoch: Epoch,
    is_loading: bool,
    is_loading_more: bool,
    sort: Option<SortSpec>,
    where_clause: Option<String>,
}

impl From<&ControllerState> for BrowseState {
    fn from(state: &ControllerState) -> Self {
        Self {
            phase: state.phase(),
            active_table: state.active_table.clone(),
            columns: state.columns.clone(),
            loaded_rows: state.offset,
            total_count: state.total_count,
            has_more: state.has_more,
            chunk_size: state.chunk_size,
            epoch: state.current_epoch,
            is_loading: state.is_loading,
            is_loading_more: state.is_loading_more,
            sort: state.sort.clone(),
            where_clause: state.where_clause.clone(),
        }
    }
}

fn action_response(session: &Session, outcome: LoadOutcome) -> Value {
    json!({
        "success": true,
        "outcome": outcome,
        "state": BrowseState::from(&session.controller.snapshot()),
    })
}

#[derive(Deserialize)]
struct SelectTableRequest {
    table: String,
}

async fn select_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectTableRequest>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;
    if !state.source.has_table(&request.table).await? {
        return Err(StudioError::TableNotFound(request.table));
    }

    let outcome = session.controller.select_table(request.table).await?;
    Ok(Json(action_response(&session, outcome)))
}

#[derive(Deserialize)]
struct SortRequest {
    column: String,
    #[serde(default)]
    direction: SortDirection,
}

async fn apply_sort(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SortRequest>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;

    // SQLite reads an unknown quoted identifier as a string literal
    if let Some(table) = session.controller.active_table() {
        let columns = columns_of(&state, &table).await?;
        if !columns.iter().any(|c| c.name == request.column) {
            return Err(StudioError::InvalidRequest(format!(
                "unknown column '{}' in table '{}'",
                request.column, table
            )));
        }
    }

    let outcome = session
        .controller
        .apply_sort(request.column, request.direction)
        .await?;
    Ok(Json(action_response(&session, outcome)))
}

async fn clear_sort(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;
    let outcome = session.controller.clear_sort().await?;
    Ok(Json(action_response(&session, outcome)))
}

#[derive(Deserialize)]
struct FilterRequest {
    expression: String,
    /// Table whose column types guide literal classification. Defaults to
    /// the session's active table.
    #[serde(default)]
    table: Option<String>,
}

async fn apply_filter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;

    let table = request.table.or_else(|| session.controller.active_table());
    let columns = match &table {
        Some(table) => columns_of(&state, table).await?,
        None => Vec::new(),
    };
    let compiled = compile_for(&request.expression, &columns, &Sqlite)?;
    tracing::debug!(
        session = %session.id,
        where_clause = %compiled.where_clause,
        "applying filter"
    );

    let outcome = session
        .controller
        .apply_filter(compiled.where_clause.clone())
        .await?;

    let mut response = action_response(&session, outcome);
    response["filter"] = json!(compiled);
    Ok(Json(response))
}

async fn clear_filter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;
    let outcome = session.controller.clear_filter().await?;
    Ok(Json(action_response(&session, outcome)))
}

async fn load_more(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;
    let outcome = session.controller.load_more_rows().await?;
    Ok(Json(action_response(&session, outcome)))
}

async fn cancel_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;
    let epoch = session.controller.cancel_query();

    Ok(Json(json!({
        "success": true,
        "epoch": epoch,
        "state": BrowseState::from(&session.controller.snapshot()),
    })))
}

#[derive(Deserialize)]
struct RowsQuery {
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    limit: Option<usize>,
}

/// A window over the rows loaded so far.
async fn get_rows(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RowsQuery>,
) -> Result<Json<Value>> {
    let session = state.sessions.require(&id)?;
    let snapshot = session.controller.snapshot();

    let start = query.offset.min(snapshot.rows.len());
    let end = match query.limit {
        Some(limit) => start.saturating_add(limit).min(snapshot.rows.len()),
        None => snapshot.rows.len(),
    };

    Ok(Json(json!({
        "success": true,
        "columns": snapshot.columns,
        "rows": &snapshot.rows[start..end],
        "offset": start,
        "loadedRows": snapshot.offset,
        "totalCount": snapshot.total_count,
        "hasMore": snapshot.has_more,
    })))
}

// ============================================================================
// Filter Preview
// ============================================================================

async fn preview_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<Value>> {
    let columns = match &request.table {
        Some(table) => columns_of(&state, table).await?,
        None => Vec::new(),
    };
    let compiled = compile_for(&request.expression, &columns, &Sqlite)?;

    Ok(Json(json!({
        "success": true,
        "whereClause": compiled.where_clause,
        "preview": compiled.preview,
    })))
}
