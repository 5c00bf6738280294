//! Data types crossing the session store port.

use chrono::{DateTime, Duration, Utc};

use nearplay_domain::{GameSession, GeoBounds};

/// How long past its scheduled start a session stays discoverable, so
/// latecomers can still join a game that just kicked off.
pub const START_LOOKBACK_SECS: i64 = 3600;

/// Hard cap on rows one discovery query returns.
pub const MAX_RESULTS: usize = 200;

/// Result ordering for discovery queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOrder {
    /// Soonest scheduled start first.
    SoonestFirst,
}

/// Filter set for one discovery query against the session store.
///
/// Built fresh for every refresh; the start cutoff is derived from the clock
/// reading at build time, never reused across refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionQuery {
    /// Spatial filter: only sessions positioned inside these bounds.
    pub bounds: GeoBounds,
    /// Sessions starting at or after this instant are eligible.
    pub starts_after: DateTime<Utc>,
    pub order: StartOrder,
    pub limit: usize,
}

impl SessionQuery {
    /// Build the standard discovery query for a viewport's bounds at `now`.
    pub fn discover(bounds: GeoBounds, now: DateTime<Utc>) -> Self {
        Self {
            bounds,
            starts_after: now - Duration::seconds(START_LOOKBACK_SECS),
            order: StartOrder::SoonestFirst,
            limit: MAX_RESULTS,
        }
    }

    /// Whether a session satisfies every filter of this query.
    ///
    /// Store implementations push these filters into their backend; this
    /// method is the reference semantics they must match.
    pub fn matches(&self, session: &GameSession) -> bool {
        session.is_discoverable(self.starts_after) && self.bounds.contains(session.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nearplay_domain::{Capacity, GeoPoint, SessionStatus, Viewport};

    fn test_bounds() -> GeoBounds {
        Viewport::new(40.0, -74.0, 0.06, 0.06).unwrap().bounds()
    }

    fn test_session(starts_at: DateTime<Utc>, position: GeoPoint) -> GameSession {
        GameSession::new("Evening Futsal", starts_at, position, Capacity::new(10).unwrap())
    }

    #[test]
    fn discover_applies_lookback_and_cap() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let query = SessionQuery::discover(test_bounds(), now);

        assert_eq!(query.starts_after, now - Duration::seconds(3600));
        assert_eq!(query.limit, 200);
        assert_eq!(query.order, StartOrder::SoonestFirst);
    }

    #[test]
    fn matches_accepts_eligible_session() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let query = SessionQuery::discover(test_bounds(), now);

        let session = test_session(now + Duration::hours(2), GeoPoint::new(40.0, -74.0));
        assert!(query.matches(&session));
    }

    #[test]
    fn matches_accepts_session_at_exact_cutoff() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let query = SessionQuery::discover(test_bounds(), now);

        let session = test_session(now - Duration::seconds(3600), GeoPoint::new(40.0, -74.0));
        assert!(query.matches(&session));
    }

    #[test]
    fn matches_rejects_session_started_too_long_ago() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let query = SessionQuery::discover(test_bounds(), now);

        let session = test_session(
            now - Duration::seconds(3601),
            GeoPoint::new(40.0, -74.0),
        );
        assert!(!query.matches(&session));
    }

    #[test]
    fn matches_rejects_session_outside_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let query = SessionQuery::discover(test_bounds(), now);

        let session = test_session(now + Duration::hours(1), GeoPoint::new(40.1, -74.0));
        assert!(!query.matches(&session));
    }

    #[test]
    fn matches_accepts_session_on_bounds_edge() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let query = SessionQuery::discover(test_bounds(), now);

        let session = test_session(now + Duration::hours(1), GeoPoint::new(40.03, -74.03));
        assert!(query.matches(&session));
    }

    #[test]
    fn matches_rejects_inactive_sessions() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let query = SessionQuery::discover(test_bounds(), now);
        let position = GeoPoint::new(40.0, -74.0);

        let cancelled = test_session(now + Duration::hours(1), position)
            .with_status(SessionStatus::Cancelled);
        let completed = test_session(now + Duration::hours(1), position)
            .with_status(SessionStatus::Completed);

        assert!(!query.matches(&cancelled));
        assert!(!query.matches(&completed));
    }
}
