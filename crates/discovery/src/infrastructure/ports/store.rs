//! Session store and auth gate ports.

use async_trait::async_trait;

use nearplay_domain::{GameSession, SessionId, UserId};

use super::error::StoreError;
use super::types::SessionQuery;

/// Read access to the remote session store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStorePort: Send + Sync {
    /// Fetch sessions matching the query, in query order, up to its limit.
    async fn find_sessions(&self, query: SessionQuery) -> Result<Vec<GameSession>, StoreError>;

    /// Current number of players signed up for a session.
    async fn count_participants(&self, session_id: SessionId) -> Result<u64, StoreError>;
}

/// Answers who is signed in right now.
///
/// Synchronous on purpose: auth state is a locally cached fact, not a
/// network call, and the discovery flow consults it before every query.
#[cfg_attr(test, mockall::automock)]
pub trait AuthGatePort: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}
