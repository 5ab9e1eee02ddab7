use std::{collections::HashMap, sync::Arc};

use chrono::{TimeDelta, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::services::chat::ChatSession;

/// One session, driven by at most one request at a time
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Chat sessions keyed by id
///
/// Sessions are created on first use and dropped when ended explicitly or after
/// sitting idle longer than the configured limit.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
    idle_limit: Option<TimeDelta>,
}

impl SessionStore {
    /// `idle_minutes <= 0` disables idle pruning
    pub fn new(idle_minutes: i64) -> Self {
        let idle_limit = if idle_minutes > 0 {
            TimeDelta::try_minutes(idle_minutes)
        } else {
            None
        };
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_limit,
        }
    }

    pub async fn create(&self) -> (Uuid, SharedSession) {
        self.get_or_create(None).await
    }

    /// Existing session for `id`, or a fresh one registered under `id` (or a new id)
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SharedSession) {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await {
                return (id, session);
            }
        }

        self.prune_idle().await;

        let id = id.unwrap_or_else(Uuid::new_v4);
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(ChatSession::new(id))))
            .clone();

        tracing::info!(session_id = %id, active_sessions = sessions.len(), "Chat session started");

        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drop a session; false if it did not exist
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Chat session ended");
        }
        removed
    }

    /// Remove sessions idle past the limit; sessions currently in use are kept
    pub async fn prune_idle(&self) -> usize {
        let Some(limit) = self.idle_limit else {
            return 0;
        };
        // A limit reaching past the earliest representable time never expires anything
        let Some(cutoff) = Utc::now().checked_sub_signed(limit) else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.last_active() >= cutoff,
            Err(_) => true,
        });
        let pruned = before - sessions.len();

        if pruned > 0 {
            tracing::debug!(pruned, remaining = sessions.len(), "Pruned idle chat sessions");
        }

        pruned
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
