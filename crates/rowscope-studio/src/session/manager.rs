use crate::config::StudioConfig;
use crate::error::{Result, StudioError};
use dashmap::DashMap;
use rowscope_core::PaginationController;
use rowscope_sqlite::SqliteSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A browser session with its own pagination controller
pub struct Session {
    pub id: String,
    pub created_at: Instant,
    last_activity: AtomicU64,
    pub controller: PaginationController<SqliteSource>,
}

impl Session {
    fn new(id: String, controller: PaginationController<SqliteSource>) -> Self {
        Self {
            id,
            created_at: Instant::now(),
            last_activity: AtomicU64::new(Self::now_timestamp()),
            controller,
        }
    }

    fn now_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    pub fn touch(&self) {
        self.last_activity.store(Self::now_timestamp(), Ordering::SeqCst);
    }

    pub fn last_activity_secs(&self) -> u64 {
        self.last_activity.load(Ordering::SeqCst)
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        let last = self.last_activity.load(Ordering::SeqCst);
        let now = Self::now_timestamp();
        now.saturating_sub(last) > timeout.as_secs()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// Manages all active sessions
pub struct SessionManager {
    sessions: DashMap<String, Arc<Session>>,
    source: Arc<SqliteSource>,
    config: StudioConfig,
}

impl SessionManager {
    pub fn new(config: StudioConfig, source: Arc<SqliteSource>) -> Self {
        Self {
            sessions: DashMap::new(),
            source,
            config,
        }
    }

    /// Create a new session browsing the shared database
    pub fn create_session(&self) -> Result<Arc<Session>> {
        if self.sessions.len() >= self.config.max_sessions {
            return Err(StudioError::TooManySessions(self.config.max_sessions));
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        let controller = PaginationController::new(self.source.clone(), self.config.paging.clone());

        let session = Arc::new(Session::new(session_id.clone(), controller));
        self.sessions.insert(session_id, session.clone());
        tracing::debug!(session = %session.id, "session created");

        Ok(session)
    }

    /// Get a session by ID, updating its last activity time
    pub fn get_session(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| {
            let session = entry.clone();
            session.touch();
            session
        })
    }

    /// Get a session by ID or fail with `SessionNotFound`
    pub fn require(&self, id: &str) -> Result<Arc<Session>> {
        self.get_session(id)
            .ok_or_else(|| StudioError::SessionNotFound(id.to_string()))
    }

    /// Check if a session exists
    pub fn has_session(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Delete a session, discarding anything it still has in flight
    pub fn delete_session(&self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.controller.close();
                true
            }
            None => false,
        }
    }

    /// Get the number of active sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Clean up expired sessions
    pub fn cleanup_expired(&self) -> usize {
        let timeout = self.config.session_timeout;
        let before = self.sessions.len();

        self.sessions.retain(|_, session| {
            let keep = !session.is_expired(timeout);
            if !keep {
                session.controller.close();
            }
            keep
        });

        before - self.sessions.len()
    }

    /// Get info about all sessions (for debugging/admin)
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        let now = Session::now_timestamp();
        self.sessions
            .iter()
            .map(|entry| {
                let session = entry.value();
                SessionInfo {
                    id: session.id.clone(),
                    age_secs: session.age().as_secs(),
                    last_activity_secs: now.saturating_sub(session.last_activity_secs()),
                    active_table: session.controller.active_table(),
                }
            })
            .collect()
    }

    /// Get the configuration
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub age_secs: u64,
    pub last_activity_secs: u64,
    pub active_table: Option<String>,
}

/// Background task to periodically clean up expired sessions
pub async fn cleanup_task(manager: Arc<SessionManager>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let cleaned = manager.cleanup_expired();
        if cleaned > 0 {
            tracing::info!("Cleaned up {} expired sessions", cleaned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(max_sessions: usize) -> SessionManager {
        let config = StudioConfig {
            max_sessions,
            ..StudioConfig::default()
        };
        let source = Arc::new(SqliteSource::open_in_memory().unwrap());
        SessionManager::new(config, source)
    }

    #[test]
    fn test_session_limit() {
        let manager = manager(2);
        manager.create_session().unwrap();
        manager.create_session().unwrap();

        let err = manager.create_session().err().unwrap();
        assert!(matches!(err, StudioError::TooManySessions(2)));
        assert_eq!(manager.session_count(), 2);
    }

    #[test]
    fn test_delete_session() {
        let manager = manager(4);
        let session = manager.create_session().unwrap();

        assert!(manager.has_session(&session.id));
        assert!(manager.delete_session(&session.id));
        assert!(!manager.delete_session(&session.id));
        assert!(matches!(
            manager.require(&session.id),
            Err(StudioError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_cleanup_expired() {
        let manager = manager(4);
        let session = manager.create_session().unwrap();

        session.last_activity.store(0, Ordering::SeqCst);
        assert_eq!(manager.cleanup_expired(), 1);
        assert_eq!(manager.session_count(), 0);
    }
}
