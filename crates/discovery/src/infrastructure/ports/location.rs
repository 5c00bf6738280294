//! Device location access port.

use async_trait::async_trait;

use nearplay_domain::GeoPoint;

use super::error::LocationError;

/// Outcome of a location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Player allowed location access.
    Granted,
    /// Player declined, or platform policy forbids asking again.
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Access to the device location service.
///
/// Implementations wrap the platform location API. Permission prompts are
/// idempotent: asking again after a grant resolves immediately with
/// `Granted` and no dialog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Ask the player for location access, returning the resulting status.
    async fn request_permission(&self) -> PermissionStatus;

    /// Resolve the device's current position.
    async fn current_position(&self) -> Result<GeoPoint, LocationError>;
}
