//! NearPlay Discovery library.
//!
//! This crate contains the map-centric discovery screen core: viewport
//! sync, session queries and marker selection.
//!
//! ## Structure
//!
//! - `use_cases/` - Viewport sync and selection flows
//! - `infrastructure/` - Ports plus the adapters that ship with the core
//! - `app` - Screen composition
//!
//! The UI shell owns the map widget; this crate owns everything behind it.
//! Handlers call in through [`DiscoveryScreen`], state changes flow out
//! through [`DiscoveryEvent`].

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::{DiscoveryConfig, DiscoveryScreen, SessionMarker};
pub use infrastructure::ports::{
    DiscoveryError, LocationError, PermissionStatus, SessionQuery, StoreError,
};
pub use use_cases::discovery::{DiscoveryEvent, Selection, SyncPhase};
