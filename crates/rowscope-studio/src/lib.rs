//! rowscope Studio - HTTP table browser
//!
//! Serves a SQLite database over a JSON API:
//! - Per-session pagination controllers with adaptive page sizes
//! - Sorting and operator-based filter expressions
//! - Live filter previews
//! - Demo movie database

pub mod config;
pub mod demo;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;
use rowscope_sqlite::SqliteSource;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::StudioConfig;
use crate::state::AppState;

/// Create the Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .merge(routes::health::routes())
        // REST API
        .merge(routes::api::routes())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Open the configured database, seeding the demo tables when requested.
pub fn open_source(config: &StudioConfig) -> error::Result<SqliteSource> {
    let source = match &config.database {
        Some(path) => SqliteSource::open(path)?,
        None => SqliteSource::open_in_memory()?,
    };

    if config.demo {
        source.with_connection(demo::seed)?;
    }

    Ok(source)
}
