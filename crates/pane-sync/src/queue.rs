//! Bounded message queue
//!
//! Multi-producer, multi-consumer FIFO with a fixed capacity. Both ends take
//! a timeout; a producer that times out gets its message back.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Fixed-capacity FIFO shared between threads.
#[derive(Debug)]
pub struct MessageQueue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: usize,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> MessageQueue<T> {
    /// Create a queue holding at most `capacity` messages (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Append a message, waiting up to `timeout` for space.
    ///
    /// On timeout the message is handed back in `Err`.
    pub fn put(&self, message: T, timeout: Duration) -> Result<(), T> {
        let deadline = Instant::now().checked_add(timeout);
        let mut items = self.items();

        while items.len() >= self.capacity {
            let Some(deadline) = deadline else {
                items = self
                    .not_full
                    .wait(items)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            };
            let now = Instant::now();
            if now >= deadline {
                return Err(message);
            }
            items = self
                .not_full
                .wait_timeout(items, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        items.push_back(message);
        drop(items);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Take the oldest message, waiting up to `timeout` for one to arrive.
    pub fn get(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now().checked_add(timeout);
        let mut items = self.items();

        loop {
            if let Some(message) = items.pop_front() {
                drop(items);
                self.not_full.notify_one();
                return Some(message);
            }

            let Some(deadline) = deadline else {
                items = self
                    .not_empty
                    .wait(items)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            };
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            items = self
                .not_empty
                .wait_timeout(items, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Take the oldest message if there is one.
    pub fn try_get(&self) -> Option<T> {
        self.get(Duration::ZERO)
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Maximum number of queued messages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every queued message.
    pub fn clear(&self) {
        self.items().clear();
        self.not_full.notify_all();
    }

    fn items(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
