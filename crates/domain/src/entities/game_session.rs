//! Game session entity - A scheduled pickup game players can discover and join
//!
//! Sessions are owned by the remote session store; the discovery core only
//! ever holds read-only, time-boxed copies of them. A fresh query result
//! fully replaces the previously visible set - there is no incremental
//! diffing of individual sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearplay_domain::{Capacity, DomainError, GeoPoint, SessionId, SkillRange};

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Open for discovery and joining
    Active,
    /// Called off by the host
    Cancelled,
    /// Already played out
    Completed,
}

impl SessionStatus {
    /// Only active sessions ever appear on the discovery map.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::parse(format!("Unknown session status: {s}"))),
        }
    }
}

/// A scheduled game session on the discovery map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: SessionId,
    pub title: String,
    /// Absolute scheduled start time
    pub starts_at: DateTime<Utc>,
    /// Where the session takes place
    pub position: GeoPoint,
    /// Human-readable venue label, if the host provided one
    pub location_label: Option<String>,
    pub capacity: Capacity,
    /// Intended skill bracket, if the host restricted one
    pub skill_range: Option<SkillRange>,
    pub status: SessionStatus,
}

impl GameSession {
    /// Create a new active session
    pub fn new(
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        position: GeoPoint,
        capacity: Capacity,
    ) -> Self {
        Self {
            id: SessionId::new(),
            title: title.into(),
            starts_at,
            position,
            location_label: None,
            capacity,
            skill_range: None,
            status: SessionStatus::Active,
        }
    }

    pub fn with_location_label(mut self, label: impl Into<String>) -> Self {
        self.location_label = Some(label.into());
        self
    }

    pub fn with_skill_range(mut self, range: SkillRange) -> Self {
        self.skill_range = Some(range);
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether this session belongs in a discovery result set, given the
    /// freshness cutoff the query was issued with.
    ///
    /// Only active sessions are discoverable, and only while they have not
    /// started earlier than the cutoff. Recently started sessions stay
    /// visible so latecomers can still join.
    pub fn is_discoverable(&self, cutoff: DateTime<Utc>) -> bool {
        self.status.is_active() && self.starts_at >= cutoff
    }
}
