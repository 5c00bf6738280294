//! Event stream for discovery state changes.
//!
//! Debounced refreshes and count fetches run in spawned tasks, so their
//! outcomes cannot travel through return values. They land here instead:
//! the presentation surface subscribes once and re-renders on each event.

use std::sync::Arc;

use tokio::sync::Mutex;

use nearplay_domain::SessionId;

use crate::infrastructure::ports::DiscoveryError;
use crate::use_cases::discovery::SyncPhase;

/// State change notifications emitted by the discovery flow.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    /// The sync state machine moved to a new phase.
    PhaseChanged(SyncPhase),
    /// A query completed and replaced the visible session set.
    SessionsRefreshed { count: usize },
    /// A refresh failed; the previously visible sessions are unchanged.
    RefreshFailed(DiscoveryError),
    /// The selected marker changed (None = selection dismissed).
    SelectionChanged(Option<SessionId>),
    /// The participant count for the current selection arrived.
    CountLoaded { session_id: SessionId, count: u64 },
}

/// Event bus for discovery state changes.
///
/// Push-based: subscribers register callbacks that are invoked when events
/// arrive. The bus holds strong references to subscribers, so they persist
/// until the bus is dropped.
#[derive(Clone)]
pub struct DiscoveryEvents {
    subscribers: Arc<Mutex<Vec<Box<dyn FnMut(DiscoveryEvent) + Send + 'static>>>>,
}

impl DiscoveryEvents {
    /// Create a new bus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to all events.
    ///
    /// The callback is invoked for every event the discovery flow emits.
    pub async fn subscribe(&self, callback: impl FnMut(DiscoveryEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch an event to all subscribers.
    pub async fn dispatch(&self, event: DiscoveryEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }

    /// Get the number of subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Clear all subscribers.
    pub async fn clear(&self) {
        self.subscribers.lock().await.clear();
    }
}

impl Default for DiscoveryEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn subscribe_and_dispatch() {
        let bus = DiscoveryEvents::new();
        let count = Arc::new(AtomicU32::new(0));

        let count_clone = Arc::clone(&count);
        bus.subscribe(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        assert_eq!(bus.subscriber_count().await, 1);

        bus.dispatch(DiscoveryEvent::SessionsRefreshed { count: 3 }).await;
        bus.dispatch(DiscoveryEvent::SelectionChanged(None)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn multiple_subscribers_each_receive_events() {
        let bus = DiscoveryEvents::new();
        let count1 = Arc::new(AtomicU32::new(0));
        let count2 = Arc::new(AtomicU32::new(0));

        let count1_clone = Arc::clone(&count1);
        bus.subscribe(move |_event| {
            count1_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        let count2_clone = Arc::clone(&count2);
        bus.subscribe(move |_event| {
            count2_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        bus.dispatch(DiscoveryEvent::PhaseChanged(SyncPhase::Settled))
            .await;

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_removes_subscribers() {
        let bus = DiscoveryEvents::new();
        bus.subscribe(|_event| {}).await;
        assert_eq!(bus.subscriber_count().await, 1);

        bus.clear().await;
        assert_eq!(bus.subscriber_count().await, 0);
    }
}
