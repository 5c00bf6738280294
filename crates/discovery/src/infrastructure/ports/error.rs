//! Error types for port operations and the discovery flow.

/// Session store operation errors with context for debugging.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Backend operation failed - includes operation name for tracing.
    #[error("Store error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Create a Backend error with operation context.
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }
}

/// Errors from the device location service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// The platform could not produce a position fix.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// Location services are switched off device-wide.
    #[error("Location service disabled")]
    ServiceDisabled,
}

/// Errors the discovery flow reports to the player surface.
///
/// Startup errors (`PermissionDenied`, `LocationUnavailable`) halt the flow
/// before a viewport exists. Refresh errors (`AuthRequired`, `QueryFailed`)
/// leave the previously loaded sessions on screen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiscoveryError {
    /// Player declined location access, or platform policy forbids it.
    #[error("Location permission denied")]
    PermissionDenied,

    /// Permission was granted but no position fix could be resolved.
    #[error("Current position unavailable: {0}")]
    LocationUnavailable(String),

    /// Nobody is signed in; session queries require an account.
    #[error("Sign-in required before discovering sessions")]
    AuthRequired,

    /// The session query failed or timed out.
    #[error("Session query failed in {operation}: {message}")]
    QueryFailed {
        operation: &'static str,
        message: String,
    },

    /// Participant count fetch failed for a selected session.
    #[error("Participant count failed for session {session_id}: {message}")]
    CountFailed {
        session_id: String,
        message: String,
    },
}

impl DiscoveryError {
    /// Create a LocationUnavailable error from the platform failure.
    pub fn location_unavailable(message: impl ToString) -> Self {
        Self::LocationUnavailable(message.to_string())
    }

    /// Create a QueryFailed error with operation context.
    pub fn query_failed(operation: &'static str, message: impl ToString) -> Self {
        Self::QueryFailed {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a CountFailed error for a session.
    pub fn count_failed(session_id: impl ToString, message: impl ToString) -> Self {
        Self::CountFailed {
            session_id: session_id.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_includes_operation() {
        let err = StoreError::backend("find_sessions", "connection reset");
        assert_eq!(
            err.to_string(),
            "Store error in find_sessions: connection reset"
        );
    }

    #[test]
    fn query_failed_includes_context() {
        let err = DiscoveryError::query_failed("find_sessions", "timed out after 10s");
        assert!(matches!(err, DiscoveryError::QueryFailed { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn location_errors_render_for_players() {
        assert_eq!(
            DiscoveryError::PermissionDenied.to_string(),
            "Location permission denied"
        );
        let err = DiscoveryError::location_unavailable(LocationError::ServiceDisabled);
        assert!(err.to_string().contains("Location service disabled"));
    }
}
