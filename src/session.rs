//! Per-session state
//!
//! A session holds the last fetched verse text and explanation. Sessions
//! are private to one browser tab; nothing is shared between them and
//! nothing outlives the process.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

/// The two cached strings of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub verse_text: Option<String>,
    pub explanation: Option<String>,
}

/// Shared handle to one session's context. Holding the lock serialises the
/// session's actions.
pub type SessionHandle = Arc<Mutex<SessionContext>>;

struct SessionEntry {
    context: SessionHandle,
    created_at: DateTime<Utc>,
    last_seen: Instant,
}

/// In-memory registry of live sessions
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Open a fresh, empty session. Sessions idle past the TTL are dropped
    /// first; open pages keep theirs alive by polling it.
    pub async fn create(&self) -> (Uuid, DateTime<Utc>) {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, "Expired idle sessions");
        }

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        sessions.insert(
            id,
            SessionEntry {
                context: Arc::new(Mutex::new(SessionContext::default())),
                created_at,
                last_seen: now,
            },
        );
        tracing::info!(session_id = %id, active = sessions.len(), "Session created");
        (id, created_at)
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Look up a session and mark it as active
    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.context.clone())
    }

    pub async fn created_at(&self, id: &Uuid) -> Option<DateTime<Utc>> {
        self.sessions.lock().await.get(id).map(|e| e.created_at)
    }

    /// End a session. Returns false if it did not exist.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.lock().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session ended");
        }
        removed
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
