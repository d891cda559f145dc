use crate::config::StudioConfig;
use crate::session::SessionManager;
use rowscope_sqlite::SqliteSource;
use std::sync::Arc;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub source: Arc<SqliteSource>,
    pub config: StudioConfig,
}

impl AppState {
    pub fn new(config: StudioConfig, source: SqliteSource) -> Self {
        let source = Arc::new(source);
        Self {
            sessions: Arc::new(SessionManager::new(config.clone(), source.clone())),
            source,
            config,
        }
    }
}
