//! Use cases - Application flows built on the ports.

pub mod discovery;

pub use discovery::{
    DiscoveryEvent, DiscoveryEvents, Selection, SelectionTracker, SyncConfig, SyncPhase,
    ViewportSync,
};
