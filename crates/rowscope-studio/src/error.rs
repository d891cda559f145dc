use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rowscope_core::FetchError;
use rowscope_filter::FilterError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Too many sessions (max: {0})")]
    TooManySessions(usize),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            StudioError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            StudioError::TooManySessions(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "TOO_MANY_SESSIONS")
            }
            StudioError::TableNotFound(_) => (StatusCode::NOT_FOUND, "TABLE_NOT_FOUND"),
            StudioError::Filter(e) => (StatusCode::BAD_REQUEST, e.kind.code()),
            StudioError::Fetch(e) => {
                let status = match e {
                    FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    FetchError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
                    FetchError::BackendQuery(_) => StatusCode::BAD_REQUEST,
                };
                (status, e.code())
            }
            StudioError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            StudioError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        };

        let mut error = json!({
            "code": error_code,
            "message": self.to_string(),
        });

        // Point the client at the offending part of the expression.
        if let StudioError::Filter(e) = &self {
            error["span"] = json!({ "start": e.span.start, "end": e.span.end });
            if let Some(hint) = &e.hint {
                error["hint"] = json!(hint);
            }
        }

        let body = Json(json!({
            "success": false,
            "error": error,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
