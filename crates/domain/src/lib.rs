extern crate self as nearplay_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{GameSession, SessionStatus};

pub use error::DomainError;

// Re-export ID types
pub use ids::{SessionId, UserId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{Capacity, GeoBounds, GeoPoint, SkillRange, Viewport, ViewportSpan};
