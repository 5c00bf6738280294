//! Discovery screen composition.
//!
//! Wires the ports into the sync and selection controllers and exposes the
//! surface the map UI talks to: handlers call in, events flow out.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use nearplay_domain::{GameSession, GeoPoint, SessionId, Viewport, ViewportSpan};

use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::ports::{
    AuthGatePort, ClockPort, DiscoveryError, LocationPort, SessionStorePort,
};
use crate::use_cases::discovery::{
    DiscoveryEvent, DiscoveryEvents, Selection, SelectionTracker, SyncConfig, SyncPhase,
    ViewportSync,
};

/// Tunables for the discovery screen.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// How long a viewport must hold still before its query fires.
    pub debounce_ms: u64,
    /// Angular size of the initial viewport around the player, in degrees.
    pub default_span_deg: f64,
    /// Deadline for a single store call, queries and counts alike.
    pub query_timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 450,
            default_span_deg: 0.06,
            query_timeout_secs: 10,
        }
    }
}

impl DiscoveryConfig {
    /// Load config from the environment.
    ///
    /// Uses `NEARPLAY_DEBOUNCE_MS`, `NEARPLAY_DEFAULT_SPAN_DEG` and
    /// `NEARPLAY_QUERY_TIMEOUT_SECS`, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            debounce_ms: env_parse("NEARPLAY_DEBOUNCE_MS", defaults.debounce_ms),
            default_span_deg: env_parse("NEARPLAY_DEFAULT_SPAN_DEG", defaults.default_span_deg),
            query_timeout_secs: env_parse(
                "NEARPLAY_QUERY_TIMEOUT_SECS",
                defaults.query_timeout_secs,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparsable config override");
                default
            }
        },
        Err(_) => default,
    }
}

/// What the map renders for one discoverable session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMarker {
    pub session_id: SessionId,
    pub position: GeoPoint,
    pub title: String,
    /// Venue label, when the host provided one.
    pub subtitle: Option<String>,
}

impl SessionMarker {
    fn from_session(session: &GameSession) -> Self {
        Self {
            session_id: session.id,
            position: session.position,
            title: session.title.clone(),
            subtitle: session.location_label.clone(),
        }
    }
}

/// Main discovery screen state.
///
/// Holds the sync and selection controllers behind the handler surface the
/// map UI calls.
pub struct DiscoveryScreen {
    sync: ViewportSync,
    selection: SelectionTracker,
    events: DiscoveryEvents,
    config: DiscoveryConfig,
}

impl DiscoveryScreen {
    /// Create a screen with all dependencies wired up.
    pub fn new(
        location: Arc<dyn LocationPort>,
        store: Arc<dyn SessionStorePort>,
        auth: Arc<dyn AuthGatePort>,
        config: DiscoveryConfig,
    ) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let events = DiscoveryEvents::new();

        let selection = SelectionTracker::new(
            Arc::clone(&store),
            events.clone(),
            Duration::from_secs(config.query_timeout_secs),
        );
        let sync = ViewportSync::new(
            location,
            store,
            auth,
            clock,
            selection.clone(),
            events.clone(),
            SyncConfig::from_settings(config.debounce_ms, config.query_timeout_secs),
        );

        Self {
            sync,
            selection,
            events,
            config,
        }
    }

    /// Subscribe to screen state changes. Handlers are kept for the
    /// lifetime of the screen.
    pub async fn subscribe<F>(&self, handler: F)
    where
        F: FnMut(DiscoveryEvent) + Send + 'static,
    {
        self.events.subscribe(handler).await;
    }

    /// Open the screen: permission prompt, position fix, first query.
    pub async fn start(&self) -> Result<Viewport, DiscoveryError> {
        let span =
            ViewportSpan::clamped(self.config.default_span_deg, self.config.default_span_deg);
        self.sync.start(span).await
    }

    /// The map surface reports a settled pan or zoom.
    pub async fn viewport_settled(&self, viewport: Viewport) {
        self.sync.viewport_settled(viewport).await;
    }

    /// Re-query the current viewport immediately, skipping the debounce.
    pub async fn refresh(&self) {
        self.sync.refresh().await;
    }

    /// Marker tap: select the session if it is still on screen.
    pub async fn marker_tapped(&self, session_id: SessionId) {
        let session = self
            .sync
            .sessions()
            .await
            .into_iter()
            .find(|s| s.id == session_id);

        match session {
            Some(session) => self.selection.select(session).await,
            // A marker can outlive its session on a fast pan; ignore it.
            None => tracing::debug!(session_id = %session_id, "Tap on unknown marker ignored"),
        }
    }

    /// Close the session panel.
    pub async fn dismiss_selection(&self) {
        self.selection.dismiss().await;
    }

    pub async fn phase(&self) -> SyncPhase {
        self.sync.phase().await
    }

    pub async fn sessions(&self) -> Vec<GameSession> {
        self.sync.sessions().await
    }

    pub async fn viewport(&self) -> Option<Viewport> {
        self.sync.viewport().await
    }

    pub async fn last_error(&self) -> Option<DiscoveryError> {
        self.sync.last_error().await
    }

    /// The selected session and its count, if a panel is open.
    pub async fn selection(&self) -> Option<Selection> {
        self.selection.selection().await
    }

    /// Marker data for everything currently visible, soonest start first.
    pub async fn markers(&self) -> Vec<SessionMarker> {
        self.sync
            .sessions()
            .await
            .iter()
            .map(SessionMarker::from_session)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    use nearplay_domain::{Capacity, UserId};

    use crate::infrastructure::auth::StaticAuthGate;
    use crate::infrastructure::memory::InMemorySessionStore;
    use crate::infrastructure::ports::{MockLocationPort, PermissionStatus};

    fn granted_location(lat: f64, lng: f64) -> MockLocationPort {
        let mut location = MockLocationPort::new();
        location
            .expect_request_permission()
            .returning(|| PermissionStatus::Granted);
        location
            .expect_current_position()
            .returning(move || Ok(GeoPoint::new(lat, lng)));
        location
    }

    fn session_at(title: &str, lat: f64, lng: f64, minutes_out: i64) -> GameSession {
        GameSession::new(
            title,
            Utc::now() + ChronoDuration::minutes(minutes_out),
            GeoPoint::new(lat, lng),
            Capacity::new(10).unwrap(),
        )
    }

    async fn seeded_store() -> (Arc<InMemorySessionStore>, GameSession, GameSession) {
        let store = Arc::new(InMemorySessionStore::new());
        let soon = session_at("Evening Futsal", 40.01, -74.01, 30)
            .with_location_label("Pier 40 Courts");
        let later = session_at("Night Basketball", 39.99, -73.99, 90);
        let faraway = session_at("Uptown Volleyball", 41.0, -74.0, 45);

        store.put_session(soon.clone()).await;
        store.put_session(later.clone()).await;
        store.put_session(faraway.clone()).await;

        (store, soon, later)
    }

    fn screen(
        location: MockLocationPort,
        store: Arc<InMemorySessionStore>,
        auth: StaticAuthGate,
    ) -> DiscoveryScreen {
        DiscoveryScreen::new(
            Arc::new(location),
            store,
            Arc::new(auth),
            DiscoveryConfig::default(),
        )
    }

    #[tokio::test]
    async fn start_shows_nearby_markers_soonest_first() {
        let (store, soon, later) = seeded_store().await;
        let screen = screen(
            granted_location(40.0, -74.0),
            store,
            StaticAuthGate::signed_in(UserId::new()),
        );

        screen.start().await.unwrap();

        assert_eq!(screen.phase().await, SyncPhase::Settled);
        let markers = screen.markers().await;
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].session_id, soon.id);
        assert_eq!(markers[1].session_id, later.id);
        assert_eq!(markers[0].title, "Evening Futsal");
        assert_eq!(markers[0].subtitle.as_deref(), Some("Pier 40 Courts"));
        assert_eq!(markers[1].subtitle, None);
    }

    #[tokio::test(start_paused = true)]
    async fn panning_away_swaps_the_visible_set() {
        let (store, _, _) = seeded_store().await;
        let screen = screen(
            granted_location(40.0, -74.0),
            store,
            StaticAuthGate::signed_in(UserId::new()),
        );

        screen.start().await.unwrap();
        assert_eq!(screen.sessions().await.len(), 2);

        let uptown = Viewport::around(
            GeoPoint::new(41.0, -74.0),
            ViewportSpan::new(0.06, 0.06).unwrap(),
        );
        screen.viewport_settled(uptown).await;
        tokio::time::sleep(Duration::from_millis(600)).await;

        let sessions = screen.sessions().await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].title, "Uptown Volleyball");
        assert_eq!(screen.phase().await, SyncPhase::Settled);
    }

    #[tokio::test(start_paused = true)]
    async fn tapping_a_marker_opens_the_panel_and_loads_the_count() {
        let (store, soon, _) = seeded_store().await;
        store.set_participants(soon.id, 7).await;
        let screen = screen(
            granted_location(40.0, -74.0),
            store,
            StaticAuthGate::signed_in(UserId::new()),
        );

        screen.start().await.unwrap();
        screen.marker_tapped(soon.id).await;

        let selection = screen.selection().await.unwrap();
        assert_eq!(selection.session.id, soon.id);
        assert!(selection.count_pending);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let selection = screen.selection().await.unwrap();
        assert_eq!(selection.participant_count, Some(7));
        assert!(!selection.count_pending);
    }

    #[tokio::test]
    async fn tapping_an_unknown_marker_is_ignored() {
        let (store, _, _) = seeded_store().await;
        let screen = screen(
            granted_location(40.0, -74.0),
            store,
            StaticAuthGate::signed_in(UserId::new()),
        );

        screen.start().await.unwrap();
        screen.marker_tapped(SessionId::new()).await;

        assert!(screen.selection().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_clears_the_panel() {
        let (store, soon, _) = seeded_store().await;
        let screen = screen(
            granted_location(40.0, -74.0),
            store,
            StaticAuthGate::signed_in(UserId::new()),
        );

        screen.start().await.unwrap();
        screen.marker_tapped(soon.id).await;
        assert!(screen.selection().await.is_some());

        screen.dismiss_selection().await;
        assert!(screen.selection().await.is_none());
    }

    #[tokio::test]
    async fn signed_out_start_settles_empty_with_auth_error() {
        let (store, _, _) = seeded_store().await;
        let screen = screen(
            granted_location(40.0, -74.0),
            store,
            StaticAuthGate::signed_out(),
        );

        let result = screen.start().await;

        assert!(result.is_ok());
        assert_eq!(screen.phase().await, SyncPhase::Settled);
        assert!(screen.sessions().await.is_empty());
        assert_eq!(screen.last_error().await, Some(DiscoveryError::AuthRequired));
    }

    #[test]
    fn markers_serialize_with_camel_case_keys() {
        let session =
            session_at("Evening Futsal", 40.0, -74.0, 30).with_location_label("Pier 40 Courts");
        let marker = SessionMarker::from_session(&session);
        let json = serde_json::to_value(&marker).unwrap();

        assert!(json.get("sessionId").is_some());
        assert_eq!(json["title"], "Evening Futsal");
        assert_eq!(json["subtitle"], "Pier 40 Courts");
    }

    #[test]
    fn config_defaults_match_the_screen_tuning() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.debounce_ms, 450);
        assert_eq!(config.query_timeout_secs, 10);
        assert!((config.default_span_deg - 0.06).abs() < f64::EPSILON);
    }
}
