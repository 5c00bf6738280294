//! Viewport-driven session discovery.
//!
//! `ViewportSync` keeps the visible session set in step with the map
//! viewport; `SelectionTracker` handles marker taps and participant counts;
//! `DiscoveryEvents` carries state changes out to the player surface.

mod events;
mod selection;
mod viewport_sync;

pub use events::{DiscoveryEvent, DiscoveryEvents};
pub use selection::{Selection, SelectionTracker};
pub use viewport_sync::{SyncConfig, SyncPhase, ViewportSync};
