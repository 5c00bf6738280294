//! Auth gate backed by a local slot.

use std::sync::RwLock;

use nearplay_domain::UserId;

use crate::infrastructure::ports::AuthGatePort;

/// Auth gate with a swappable signed-in user.
///
/// Suitable for tests, demos, and hosts that manage sign-in elsewhere and
/// push the result here. A poisoned slot reads as signed out.
pub struct StaticAuthGate {
    user: RwLock<Option<UserId>>,
}

impl StaticAuthGate {
    /// Gate reporting the given player as signed in.
    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    /// Gate with nobody signed in.
    pub fn signed_out() -> Self {
        Self {
            user: RwLock::new(None),
        }
    }

    /// Replace the signed-in user (None signs out).
    pub fn set_user(&self, user: Option<UserId>) {
        if let Ok(mut slot) = self.user.write() {
            *slot = user;
        }
    }
}

impl AuthGatePort for StaticAuthGate {
    fn current_user(&self) -> Option<UserId> {
        self.user.read().ok().and_then(|slot| *slot)
    }
}
