//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the discovery crate. Ports exist for:
//! - The remote session store (could swap HTTP backend -> local cache)
//! - Device location access (platform API)
//! - Auth state (who is signed in)
//! - Clock (for testing)

mod error;
mod location;
mod store;
mod testing;
pub mod types;

// =============================================================================
// Store and Device Ports
// =============================================================================
pub use location::{LocationPort, PermissionStatus};
pub use store::{AuthGatePort, SessionStorePort};

// =============================================================================
// Types from types module (re-export for visibility)
// =============================================================================
pub use types::{SessionQuery, StartOrder, MAX_RESULTS, START_LOOKBACK_SECS};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{DiscoveryError, LocationError, StoreError};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use location::MockLocationPort;

#[cfg(test)]
pub use store::{MockAuthGatePort, MockSessionStorePort};

#[cfg(test)]
pub use testing::MockClockPort;
