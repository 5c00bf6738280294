//! Viewport-driven refresh loop for the discovery map.
//!
//! The map surface reports every settled pan or zoom; this controller turns
//! those reports into session store queries and keeps the visible session
//! set in sync with the viewport the player is actually looking at:
//!
//! - **Debounce**: a settled viewport arms a single timer; settling again
//!   before it fires replaces it, so a pan burst costs one query.
//! - **Sequence stamps**: every issued query gets a monotone stamp and only
//!   the latest issued stamp may apply. A superseded response is dropped
//!   whole: no rows, no error, no phase change.
//! - **Auth gate**: the signed-in check runs before every query, never once
//!   at startup.
//! - **Selection**: issuing a query dismisses the open session panel, since
//!   the visible rows it points into are about to be replaced.
//!
//! Refresh failures keep the previous sessions on screen; only startup
//! failures (permission, position fix) put the flow into the error phase.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use nearplay_domain::{GameSession, Viewport, ViewportSpan};

use crate::infrastructure::ports::{
    AuthGatePort, ClockPort, DiscoveryError, LocationPort, SessionQuery, SessionStorePort,
};
use crate::use_cases::discovery::events::{DiscoveryEvent, DiscoveryEvents};
use crate::use_cases::discovery::selection::SelectionTracker;

/// Phase of the discovery sync state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Nothing started yet.
    Idle,
    /// Waiting for permission and a first position fix.
    LocationPending,
    /// A query is debouncing or in flight.
    FetchPending,
    /// The visible set matches the last settled viewport.
    Settled,
    /// Startup failed before any viewport was established.
    Error,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncPhase::Idle => write!(f, "idle"),
            SyncPhase::LocationPending => write!(f, "location-pending"),
            SyncPhase::FetchPending => write!(f, "fetch-pending"),
            SyncPhase::Settled => write!(f, "settled"),
            SyncPhase::Error => write!(f, "error"),
        }
    }
}

/// Timing knobs for the refresh loop.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long a viewport must hold still before its query fires.
    pub debounce: Duration,
    /// Deadline for one session store call.
    pub query_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(450),
            query_timeout: Duration::from_secs(10),
        }
    }
}

impl SyncConfig {
    /// Create config from DiscoveryConfig values
    pub fn from_settings(debounce_ms: u64, query_timeout_secs: u64) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            query_timeout: Duration::from_secs(query_timeout_secs),
        }
    }
}

/// Mutable state behind the sync controller.
struct SyncState {
    phase: SyncPhase,
    /// Last viewport reported by the map surface.
    viewport: Option<Viewport>,
    /// Sessions from the latest applied query result.
    sessions: Vec<GameSession>,
    /// Most recent refresh failure; cleared by the next applied success.
    last_error: Option<DiscoveryError>,
    /// Armed debounce timer. Holds only a timer that has not claimed itself
    /// yet; a query in flight is never reachable from here.
    debounce: Option<JoinHandle<()>>,
}

/// Keeps the visible session set in sync with the map viewport.
///
/// Clone-cheap: clones share the same state and event stream, which is how
/// spawned debounce timers call back into the controller.
#[derive(Clone)]
pub struct ViewportSync {
    location: Arc<dyn LocationPort>,
    store: Arc<dyn SessionStorePort>,
    auth: Arc<dyn AuthGatePort>,
    clock: Arc<dyn ClockPort>,
    /// Issuing a query closes the open session panel; the rows it pointed
    /// into are being replaced.
    selection: SelectionTracker,
    events: DiscoveryEvents,
    config: SyncConfig,
    state: Arc<RwLock<SyncState>>,
    /// Monotone stamp for issued queries; only the latest may apply.
    refresh_seq: Arc<AtomicU64>,
}

impl ViewportSync {
    pub fn new(
        location: Arc<dyn LocationPort>,
        store: Arc<dyn SessionStorePort>,
        auth: Arc<dyn AuthGatePort>,
        clock: Arc<dyn ClockPort>,
        selection: SelectionTracker,
        events: DiscoveryEvents,
        config: SyncConfig,
    ) -> Self {
        Self {
            location,
            store,
            auth,
            clock,
            selection,
            events,
            config,
            state: Arc::new(RwLock::new(SyncState {
                phase: SyncPhase::Idle,
                viewport: None,
                sessions: Vec::new(),
                last_error: None,
                debounce: None,
            })),
            refresh_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current phase of the state machine.
    pub async fn phase(&self) -> SyncPhase {
        self.state.read().await.phase
    }

    /// Sessions from the latest applied refresh.
    pub async fn sessions(&self) -> Vec<GameSession> {
        self.state.read().await.sessions.clone()
    }

    /// Last viewport the map settled on.
    pub async fn viewport(&self) -> Option<Viewport> {
        self.state.read().await.viewport
    }

    /// Most recent refresh failure, if any since the last applied success.
    pub async fn last_error(&self) -> Option<DiscoveryError> {
        self.state.read().await.last_error.clone()
    }

    /// Begin the discovery flow: permission prompt, position fix, and the
    /// first query, centered on the player with the given span.
    ///
    /// Returns the initial viewport. An `Err` here means the screen never
    /// got a viewport; refresh failures after this point are reported
    /// through the event stream and `last_error` instead.
    pub async fn start(&self, span: ViewportSpan) -> Result<Viewport, DiscoveryError> {
        self.set_phase(SyncPhase::LocationPending).await;

        if !self.location.request_permission().await.is_granted() {
            tracing::warn!("Location permission denied, discovery unavailable");
            self.fail_startup(DiscoveryError::PermissionDenied).await;
            return Err(DiscoveryError::PermissionDenied);
        }

        let position = match self.location.current_position().await {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!(error = %e, "Could not resolve device position");
                let error = DiscoveryError::location_unavailable(e);
                self.fail_startup(error.clone()).await;
                return Err(error);
            }
        };

        let viewport = Viewport::around(position, span);
        {
            let mut state = self.state.write().await;
            state.viewport = Some(viewport);
            state.phase = SyncPhase::FetchPending;
        }
        self.events
            .dispatch(DiscoveryEvent::PhaseChanged(SyncPhase::FetchPending))
            .await;

        tracing::info!(center = %viewport.center(), "Discovery map ready");

        // The first query fires immediately; debounce only applies to later
        // viewport moves.
        self.run_refresh(viewport).await;

        Ok(viewport)
    }

    /// Record a settled viewport and (re)arm the debounce timer.
    ///
    /// Each call replaces an armed, unfired timer. Queries already in
    /// flight are never cancelled here; they lose the sequence race
    /// instead.
    pub async fn viewport_settled(&self, viewport: Viewport) {
        let phase_changed = {
            let mut state = self.state.write().await;
            state.viewport = Some(viewport);

            if let Some(timer) = state.debounce.take() {
                timer.abort();
            }

            let this = self.clone();
            state.debounce = Some(tokio::spawn(async move {
                tokio::time::sleep(this.config.debounce).await;
                this.debounce_fired(viewport).await;
            }));

            if state.phase == SyncPhase::FetchPending {
                false
            } else {
                state.phase = SyncPhase::FetchPending;
                true
            }
        };

        if phase_changed {
            self.events
                .dispatch(DiscoveryEvent::PhaseChanged(SyncPhase::FetchPending))
                .await;
        }
    }

    /// Re-run the query for the current viewport immediately, skipping the
    /// debounce. No-op when no viewport is established yet.
    pub async fn refresh(&self) {
        let viewport = {
            let mut state = self.state.write().await;
            if let Some(timer) = state.debounce.take() {
                // The manual refresh covers whatever the timer would have
                // queried; drop it instead of querying twice.
                timer.abort();
            }
            state.viewport
        };

        let Some(viewport) = viewport else {
            tracing::debug!("Refresh requested before any viewport, ignoring");
            return;
        };

        self.set_phase(SyncPhase::FetchPending).await;
        self.run_refresh(viewport).await;
    }

    /// Runs once the debounce window elapses with no further moves.
    async fn debounce_fired(&self, viewport: Viewport) {
        {
            // Claim our handle out of the slot before querying. A later
            // rearm aborts whatever handle sits in the slot, and a query in
            // flight must not be killed mid-call. The slot still holds our
            // own handle here: any rearm before this point would have
            // aborted us while we waited for the lock.
            let mut state = self.state.write().await;
            state.debounce = None;
        }

        self.run_refresh(viewport).await;
    }

    /// Issue a stamped query for the viewport and apply the outcome if the
    /// stamp is still the latest when the store answers.
    async fn run_refresh(&self, viewport: Viewport) {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;

        // Auth gate runs before anything touches the store. A blocked
        // refresh leaves the open panel alone.
        let Some(user) = self.auth.current_user() else {
            tracing::debug!(seq, "Refresh blocked: nobody signed in");
            self.apply_failure(seq, DiscoveryError::AuthRequired).await;
            return;
        };

        self.selection.dismiss().await;

        let query = SessionQuery::discover(viewport.bounds(), self.clock.now());
        tracing::debug!(seq, user = %user, limit = query.limit, "Issuing discovery query");

        let outcome = tokio::time::timeout(
            self.config.query_timeout,
            self.store.find_sessions(query),
        )
        .await;

        match outcome {
            Ok(Ok(sessions)) => self.apply_success(seq, sessions).await,
            Ok(Err(e)) => {
                self.apply_failure(seq, DiscoveryError::query_failed("find_sessions", e))
                    .await;
            }
            Err(_) => {
                let error = DiscoveryError::query_failed(
                    "find_sessions",
                    format!("timed out after {:?}", self.config.query_timeout),
                );
                self.apply_failure(seq, error).await;
            }
        }
    }

    async fn apply_success(&self, seq: u64, sessions: Vec<GameSession>) {
        let applied = {
            let mut state = self.state.write().await;
            if seq != self.refresh_seq.load(Ordering::SeqCst) {
                None
            } else {
                let count = sessions.len();
                state.sessions = sessions;
                state.last_error = None;
                let next = self.phase_after_apply(&state);
                let changed = state.phase != next;
                state.phase = next;
                Some((count, changed, next))
            }
        };

        match applied {
            None => tracing::debug!(seq, "Discarding superseded query result"),
            Some((count, phase_changed, phase)) => {
                tracing::debug!(seq, count, "Applied discovery result");
                if phase_changed {
                    self.events
                        .dispatch(DiscoveryEvent::PhaseChanged(phase))
                        .await;
                }
                self.events
                    .dispatch(DiscoveryEvent::SessionsRefreshed { count })
                    .await;
            }
        }
    }

    async fn apply_failure(&self, seq: u64, error: DiscoveryError) {
        let applied = {
            let mut state = self.state.write().await;
            if seq != self.refresh_seq.load(Ordering::SeqCst) {
                None
            } else {
                state.last_error = Some(error.clone());
                let next = self.phase_after_apply(&state);
                let changed = state.phase != next;
                state.phase = next;
                Some((changed, next))
            }
        };

        match applied {
            None => tracing::debug!(seq, error = %error, "Discarding superseded query failure"),
            Some((phase_changed, phase)) => {
                tracing::warn!(seq, error = %error, "Refresh failed, keeping previous sessions");
                if phase_changed {
                    self.events
                        .dispatch(DiscoveryEvent::PhaseChanged(phase))
                        .await;
                }
                self.events
                    .dispatch(DiscoveryEvent::RefreshFailed(error))
                    .await;
            }
        }
    }

    /// An applied outcome settles the screen unless another move is already
    /// debouncing behind it.
    fn phase_after_apply(&self, state: &SyncState) -> SyncPhase {
        if state.debounce.is_none() {
            SyncPhase::Settled
        } else {
            SyncPhase::FetchPending
        }
    }

    async fn set_phase(&self, phase: SyncPhase) {
        let changed = {
            let mut state = self.state.write().await;
            if state.phase == phase {
                false
            } else {
                state.phase = phase;
                true
            }
        };

        if changed {
            tracing::debug!(phase = %phase, "Sync phase changed");
            self.events
                .dispatch(DiscoveryEvent::PhaseChanged(phase))
                .await;
        }
    }

    async fn fail_startup(&self, error: DiscoveryError) {
        {
            let mut state = self.state.write().await;
            state.phase = SyncPhase::Error;
            state.last_error = Some(error);
        }
        self.events
            .dispatch(DiscoveryEvent::PhaseChanged(SyncPhase::Error))
            .await;
    }
}
