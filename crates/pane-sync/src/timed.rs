//! Timed mutex
//!
//! A non-reentrant mutex whose acquisition takes a timeout. This is the lock
//! used for the render engine and for service-internal state: a caller that
//! cannot get the lock in time logs and degrades instead of blocking.
//!
//! # Safety Invariants
//!
//! 1. **Exclusive access**: `locked == true` for exactly as long as one guard
//!    exists; only that guard produces `&mut T`
//! 2. **T: Send suffices for Sync**: same reasoning as `std::sync::Mutex`

use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A mutex with bounded-wait acquisition.
pub struct TimedMutex<T: ?Sized> {
    locked: Mutex<bool>,
    released: Condvar,
    data: UnsafeCell<T>,
}

// SAFETY: see invariant 2.
unsafe impl<T: ?Sized + Send> Send for TimedMutex<T> {}
unsafe impl<T: ?Sized + Send> Sync for TimedMutex<T> {}

impl<T> TimedMutex<T> {
    /// Create a new unlocked mutex.
    pub const fn new(value: T) -> Self {
        Self {
            locked: Mutex::new(false),
            released: Condvar::new(),
            data: UnsafeCell::new(value),
        }
    }

    /// Consume the mutex and return the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> TimedMutex<T> {
    /// Acquire the lock, waiting at most `timeout`.
    ///
    /// Returns `None` when the lock could not be obtained in time.
    pub fn lock(&self, timeout: Duration) -> Option<TimedMutexGuard<'_, T>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut locked = self.flag();

        while *locked {
            locked = match deadline {
                None => self
                    .released
                    .wait(locked)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    self.released
                        .wait_timeout(locked, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }

        *locked = true;
        Some(TimedMutexGuard {
            mutex: self,
            _not_send: PhantomData,
        })
    }

    /// Acquire the lock without a time limit.
    pub fn lock_forever(&self) -> TimedMutexGuard<'_, T> {
        let mut locked = self.flag();
        while *locked {
            locked = self
                .released
                .wait(locked)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *locked = true;
        TimedMutexGuard {
            mutex: self,
            _not_send: PhantomData,
        }
    }

    /// Acquire the lock only if it is free right now.
    pub fn try_lock(&self) -> Option<TimedMutexGuard<'_, T>> {
        self.lock(Duration::ZERO)
    }

    /// Whether some thread holds the lock at this instant.
    pub fn is_locked(&self) -> bool {
        *self.flag()
    }

    /// Get a mutable reference to the value; no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        self.locked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unlock(&self) {
        *self.flag() = false;
        self.released.notify_one();
    }
}

impl<T: Default> Default for TimedMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized> fmt::Debug for TimedMutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedMutex")
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

/// RAII guard for [`TimedMutex`].
#[must_use = "if unused the TimedMutex will immediately unlock"]
pub struct TimedMutexGuard<'a, T: ?Sized> {
    mutex: &'a TimedMutex<T>,
    _not_send: PhantomData<*const ()>,
}

impl<T: ?Sized> Deref for TimedMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: invariant 1
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T: ?Sized> DerefMut for TimedMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: invariant 1
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T: ?Sized> Drop for TimedMutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.unlock();
    }
}

// SAFETY: a shared guard only exposes `&T`.
unsafe impl<T: ?Sized + Sync> Sync for TimedMutexGuard<'_, T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for TimedMutexGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
