//! Publish/Subscribe Bus for Pane
//!
//! Decoupled one-to-many notification between producers (drivers, services)
//! and consumers (apps, other services).
//!
//! A *topic* is one `PubSub<M>` instance; `M` is the message type carried on
//! it. Owners typically expose their topic through an accessor such as
//! `Loader::pubsub()`.
//!
//! # Delivery
//!
//! `publish()` calls every subscriber synchronously, on the publisher's
//! thread, in subscription order. The message only needs to outlive the call.
//!
//! # Unsubscribing during publish
//!
//! Each publish works on a snapshot of the subscriber list taken under the
//! internal lock; the lock is not held while callbacks run. A subscriber
//! removed mid-publish (including a callback removing itself) is skipped if
//! it has not been called yet, and never called again afterwards.

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const TAG: &str = "pubsub";

/// Opaque handle returned by [`PubSub::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Errors reported by the bus
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PubSubError {
    /// The handle was never issued by this topic or was already released
    UnknownSubscription(SubscriptionId),
}

impl fmt::Display for PubSubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PubSubError::UnknownSubscription(id) => {
                write!(f, "Unknown or released subscription: {}", id)
            }
        }
    }
}

impl std::error::Error for PubSubError {}

type Callback<M> = Arc<dyn Fn(&M) + Send + Sync>;

struct Subscriber<M: ?Sized> {
    id: SubscriptionId,
    callback: Callback<M>,
    /// Cleared on unsubscribe so in-flight snapshots skip the callback
    active: Arc<AtomicBool>,
}

/// A topic: an ordered list of callbacks receiving messages of type `M`.
pub struct PubSub<M: ?Sized> {
    subscribers: Mutex<Vec<Subscriber<M>>>,
    next_id: AtomicU64,
}

impl<M: ?Sized> PubSub<M> {
    /// Create a topic with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback`; it stays subscribed until [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers().push(Subscriber {
            id,
            callback: Arc::new(callback),
            active: Arc::new(AtomicBool::new(true)),
        });
        id
    }

    /// Remove a subscription.
    ///
    /// Releasing an unknown handle is a programming error: it is logged and
    /// reported, and the subscriber list is left untouched.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), PubSubError> {
        let mut subscribers = self.subscribers();
        let Some(index) = subscribers.iter().position(|s| s.id == id) else {
            drop(subscribers);
            log::error!(target: TAG, "unsubscribe: {} not found", id);
            return Err(PubSubError::UnknownSubscription(id));
        };

        let removed = subscribers.remove(index);
        removed.active.store(false, Ordering::Release);
        Ok(())
    }

    /// Deliver `message` to every subscriber, in subscription order.
    pub fn publish(&self, message: &M) {
        let snapshot: Vec<(Callback<M>, Arc<AtomicBool>)> = self
            .subscribers()
            .iter()
            .map(|s| (Arc::clone(&s.callback), Arc::clone(&s.active)))
            .collect();

        for (callback, active) in snapshot {
            if active.load(Ordering::Acquire) {
                callback(message);
            }
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<Subscriber<M>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M: ?Sized> Default for PubSub<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ?Sized> fmt::Debug for PubSub<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn test_ids_are_unique() {
        let bus: PubSub<u32> = PubSub::new();
        let a = bus.subscribe(|_| {});
        let b = bus.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_double_unsubscribe_is_reported() {
        let bus: PubSub<u32> = PubSub::new();
        let id = bus.subscribe(|_| {});
        assert_eq!(bus.unsubscribe(id), Ok(()));
        assert_eq!(bus.unsubscribe(id), Err(PubSubError::UnknownSubscription(id)));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_unsized_topic() {
        let bus: PubSub<str> = PubSub::new();
        let seen = Arc::new(StdMutex::new(String::new()));
        let s = Arc::clone(&seen);
        bus.subscribe(move |msg: &str| s.lock().unwrap().push_str(msg));
        bus.publish("hello");
        assert_eq!(*seen.lock().unwrap(), "hello");
    }
}
