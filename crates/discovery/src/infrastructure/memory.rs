//! In-memory session store for tests, demos, and offline development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use nearplay_domain::{GameSession, SessionId};

use crate::infrastructure::ports::{SessionQuery, SessionStorePort, StartOrder, StoreError};

/// Session store backed by a plain in-memory map.
///
/// Applies the same filter, order, and cap semantics a remote backend would,
/// which makes it the reference implementation for `SessionQuery`.
#[derive(Default)]
pub struct InMemorySessionStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    sessions: HashMap<SessionId, GameSession>,
    participants: HashMap<SessionId, u64>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session.
    pub async fn put_session(&self, session: GameSession) {
        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id, session);
    }

    /// Set the participant count for a session.
    pub async fn set_participants(&self, session_id: SessionId, count: u64) {
        let mut inner = self.inner.write().await;
        inner.participants.insert(session_id, count);
    }

    /// Remove a session and its participant record.
    pub async fn remove_session(&self, session_id: SessionId) {
        let mut inner = self.inner.write().await;
        inner.sessions.remove(&session_id);
        inner.participants.remove(&session_id);
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }
}

#[async_trait]
impl SessionStorePort for InMemorySessionStore {
    async fn find_sessions(&self, query: SessionQuery) -> Result<Vec<GameSession>, StoreError> {
        let inner = self.inner.read().await;

        let mut matched: Vec<GameSession> = inner
            .sessions
            .values()
            .filter(|session| query.matches(session))
            .cloned()
            .collect();

        match query.order {
            StartOrder::SoonestFirst => matched.sort_by_key(|session| session.starts_at),
        }
        matched.truncate(query.limit);

        Ok(matched)
    }

    async fn count_participants(&self, session_id: SessionId) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;

        if !inner.sessions.contains_key(&session_id) {
            return Err(StoreError::backend(
                "count_participants",
                format!("unknown session: {session_id}"),
            ));
        }

        Ok(inner.participants.get(&session_id).copied().unwrap_or(0))
    }
}
