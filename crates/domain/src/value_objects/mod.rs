//! Value objects - Immutable objects defined by their attributes

mod capacity;
mod geo;
mod skill_range;

pub use capacity::Capacity;
pub use geo::{GeoBounds, GeoPoint, Viewport, ViewportSpan};
pub use skill_range::SkillRange;
