//! Marker selection and the lazily fetched participant count.
//!
//! Tapping a marker shows the session panel immediately; the head count is
//! fetched behind it and filled in when it arrives. A count result only
//! applies while the selection that requested it is still current, checked
//! with a change token bumped on every select and dismiss. Count failures
//! never surface to the player: the panel just keeps showing the session
//! without a number.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use nearplay_domain::{GameSession, SessionId};

use crate::infrastructure::ports::{DiscoveryError, SessionStorePort};
use crate::use_cases::discovery::events::{DiscoveryEvent, DiscoveryEvents};

/// The session the player tapped, plus its lazily fetched head count.
#[derive(Debug, Clone)]
pub struct Selection {
    pub session: GameSession,
    /// `None` until the count query answers; stays `None` if it fails.
    pub participant_count: Option<u64>,
    /// True while the count fetch is still out. Lets the panel tell
    /// "loading" apart from "unavailable".
    pub count_pending: bool,
}

/// Tracks which session is selected and resolves its participant count.
///
/// Clone-cheap: clones share state, which is how the spawned count fetch
/// reports back.
#[derive(Clone)]
pub struct SelectionTracker {
    store: Arc<dyn SessionStorePort>,
    events: DiscoveryEvents,
    state: Arc<RwLock<Option<Selection>>>,
    /// Bumped on every select and dismiss; a count result may only apply
    /// while its token is still current. Bumps happen under the state write
    /// lock so the token and the stored selection never drift apart.
    change_token: Arc<AtomicU64>,
    count_timeout: Duration,
}

impl SelectionTracker {
    pub fn new(
        store: Arc<dyn SessionStorePort>,
        events: DiscoveryEvents,
        count_timeout: Duration,
    ) -> Self {
        Self {
            store,
            events,
            state: Arc::new(RwLock::new(None)),
            change_token: Arc::new(AtomicU64::new(0)),
            count_timeout,
        }
    }

    /// The current selection, if any.
    pub async fn selection(&self) -> Option<Selection> {
        self.state.read().await.clone()
    }

    /// Select a session and kick off its participant count fetch.
    ///
    /// Replaces any previous selection; a count still in flight for the old
    /// one loses its token and is dropped when it lands.
    pub async fn select(&self, session: GameSession) {
        let session_id = session.id;

        let token = {
            let mut state = self.state.write().await;
            let token = self.change_token.fetch_add(1, Ordering::SeqCst) + 1;
            *state = Some(Selection {
                session,
                participant_count: None,
                count_pending: true,
            });
            token
        };
        self.events
            .dispatch(DiscoveryEvent::SelectionChanged(Some(session_id)))
            .await;

        // The panel shows right away; the count streams in behind it.
        let this = self.clone();
        tokio::spawn(async move {
            this.fetch_count(session_id, token).await;
        });
    }

    /// Clear the selection. Emits nothing when none was active.
    pub async fn dismiss(&self) {
        let had_selection = {
            let mut state = self.state.write().await;
            self.change_token.fetch_add(1, Ordering::SeqCst);
            state.take().is_some()
        };

        if had_selection {
            self.events
                .dispatch(DiscoveryEvent::SelectionChanged(None))
                .await;
        }
    }

    async fn fetch_count(&self, session_id: SessionId, token: u64) {
        let outcome = tokio::time::timeout(
            self.count_timeout,
            self.store.count_participants(session_id),
        )
        .await;

        let count = match outcome {
            Ok(Ok(count)) => Some(count),
            Ok(Err(e)) => {
                let error = DiscoveryError::count_failed(session_id, e);
                tracing::warn!(error = %error, "Participant count unavailable");
                None
            }
            Err(_) => {
                let error = DiscoveryError::count_failed(
                    session_id,
                    format!("timed out after {:?}", self.count_timeout),
                );
                tracing::warn!(error = %error, "Participant count unavailable");
                None
            }
        };

        let applied = {
            let mut state = self.state.write().await;
            if token != self.change_token.load(Ordering::SeqCst) {
                false
            } else {
                match state.as_mut() {
                    Some(selection) if selection.session.id == session_id => {
                        selection.participant_count = count;
                        selection.count_pending = false;
                        true
                    }
                    _ => false,
                }
            }
        };

        match (applied, count) {
            // Only a resolved count is worth announcing; a failure just
            // stops the pending state.
            (true, Some(count)) => {
                self.events
                    .dispatch(DiscoveryEvent::CountLoaded { session_id, count })
                    .await;
            }
            (true, None) => {}
            (false, _) => {
                tracing::debug!(session_id = %session_id, "Dropping count for a superseded selection");
            }
        }
    }
}
