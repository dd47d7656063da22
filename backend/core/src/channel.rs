use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::debug;

/// Default capacity of a one-shot event channel.
const DEFAULT_EVENT_CAPACITY: usize = 16;

/// A replace-on-write slot holding the latest published value.
///
/// Subscribers that attach late still read the current value; intermediate
/// values they missed are gone.
pub struct LatestSlot<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T: Clone + Send + Sync> LatestSlot<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current value and wake every subscriber.
    ///
    /// Stores the value even when nobody is subscribed.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(value);
        debug!(subscribers = self.tx.receiver_count(), "Latest-value slot updated");
    }

    /// Snapshot of the current value.
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T> Clone for LatestSlot<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

/// A fire-once broadcast: each event reaches the subscribers active when it
/// is published and is never replayed.
pub struct EventChannel<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> EventChannel<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event, returning how many subscribers will see it.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: T) -> usize {
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                debug!("Event published with no subscribers; dropped");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Send + 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventChannel<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
