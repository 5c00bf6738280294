//! Player capacity of a game session
//!
//! A newtype representing how many players a session admits,
//! ensuring zero-capacity sessions cannot be constructed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of players a session admits (validated newtype)
///
/// # Validation Rules
///
/// - Value must be >= 1 (a session always admits at least one player)
/// - Value must be <= 1000 - prevents unreasonably large sessions
///
/// # Examples
///
/// ```
/// use nearplay_domain::value_objects::Capacity;
///
/// let capacity = Capacity::new(10).unwrap();
/// assert_eq!(capacity.value(), 10);
///
/// assert!(Capacity::new(0).is_err());
/// assert!(Capacity::new(1001).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// Minimum valid value: 1 player
    pub const MIN: u32 = 1;

    /// Maximum valid value: 1000 players
    pub const MAX: u32 = 1000;

    /// Create a new `Capacity` value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the value is outside valid range.
    pub fn new(players: u32) -> Result<Self, crate::DomainError> {
        if players < Self::MIN {
            return Err(crate::DomainError::validation(format!(
                "Capacity must be >= {} player, got {}",
                Self::MIN,
                players
            )));
        }

        if players > Self::MAX {
            return Err(crate::DomainError::validation(format!(
                "Capacity must be <= {} players, got {}",
                Self::MAX,
                players
            )));
        }

        Ok(Self(players))
    }

    /// Create a new `Capacity`, clamping to valid range.
    pub fn clamped(players: u32) -> Self {
        Self(players.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the underlying `u32` value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether the given participant count fills the session.
    pub fn is_full(self, participants: u64) -> bool {
        participants >= u64::from(self.0)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} players", self.0)
    }
}

// Implement conversions for interop with code using raw u32

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.0
    }
}

impl TryFrom<u32> for Capacity {
    type Error = crate::DomainError;

    fn try_from(players: u32) -> Result<Self, Self::Error> {
        Self::new(players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_valid_values() {
        let capacity = Capacity::new(8).unwrap();
        assert_eq!(capacity.value(), 8);
    }

    #[test]
    fn new_rejects_zero() {
        let result = Capacity::new(0);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("must be >= 1"));
        }
    }

    #[test]
    fn new_rejects_too_large() {
        assert!(Capacity::new(1001).is_err());
    }

    #[test]
    fn clamped_brings_zero_to_min() {
        assert_eq!(Capacity::clamped(0).value(), 1);
    }

    #[test]
    fn is_full_compares_against_value() {
        let capacity = Capacity::new(4).unwrap();
        assert!(!capacity.is_full(3));
        assert!(capacity.is_full(4));
        assert!(capacity.is_full(5));
    }

    #[test]
    fn display_formats_correctly() {
        let capacity = Capacity::new(6).unwrap();
        assert_eq!(capacity.to_string(), "6 players");
    }
}
