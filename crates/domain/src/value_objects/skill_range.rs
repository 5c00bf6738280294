//! Skill bracket a session is intended for

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Inclusive skill bracket for a session (validated)
///
/// Levels are unit-less ranks supplied by the host. The only invariant is
/// that the bracket is ordered; hosts decide what the numbers mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRange {
    min: u32,
    max: u32,
}

impl SkillRange {
    /// Create a new `SkillRange`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::validation(format!(
                "Skill range must be ordered, got {min}..={max}"
            )));
        }

        Ok(Self { min, max })
    }

    #[inline]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[inline]
    pub const fn max(self) -> u32 {
        self.max
    }

    /// Whether a player of the given level falls inside the bracket.
    pub fn admits(self, level: u32) -> bool {
        level >= self.min && level <= self.max
    }
}

impl fmt::Display for SkillRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}
