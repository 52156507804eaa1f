//! Reentrant mutex
//!
//! A mutex that the holding thread may lock again without deadlocking.
//! Ownership is tracked explicitly as `(holder thread, depth)`; the lock is
//! released when the depth returns to zero.
//!
//! # Safety Invariants
//!
//! 1. **Single holder**: At most one thread has `holder == Some(id)` at any time
//! 2. **Shared access only**: Guards hand out `&T`, never `&mut T`, because
//!    several guards can be alive on the holder thread at once. Use a
//!    `RefCell` (or atomics) inside for mutation.
//! 3. **Thread-bound guards**: Guards are `!Send`, so `&T` is only ever
//!    observed on the holder thread. This is why `T: Send` suffices for
//!    `Sync`.

use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

/// Ownership record protected by the inner mutex
#[derive(Debug)]
struct Ownership {
    /// Thread currently holding the lock
    holder: Option<ThreadId>,
    /// Number of outstanding guards on the holder thread
    depth: usize,
}

/// A reentrant mutual-exclusion lock.
///
/// `lock()` waits forever; `try_lock_for()` gives up after a timeout.
pub struct RecursiveMutex<T: ?Sized> {
    ownership: Mutex<Ownership>,
    released: Condvar,
    data: UnsafeCell<T>,
}

// SAFETY: the value can be moved between threads when T can.
unsafe impl<T: ?Sized + Send> Send for RecursiveMutex<T> {}

// SAFETY: only the holder thread can obtain `&T` (guards are !Send, see
// module docs), so concurrent shared access from two threads never happens.
unsafe impl<T: ?Sized + Send> Sync for RecursiveMutex<T> {}

impl<T> RecursiveMutex<T> {
    /// Create a new unlocked mutex.
    pub const fn new(value: T) -> Self {
        Self {
            ownership: Mutex::new(Ownership {
                holder: None,
                depth: 0,
            }),
            released: Condvar::new(),
            data: UnsafeCell::new(value),
        }
    }

    /// Consume the mutex and return the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> RecursiveMutex<T> {
    /// Acquire the lock, waiting as long as it takes.
    ///
    /// Succeeds immediately if the calling thread already holds the lock.
    pub fn lock(&self) -> RecursiveMutexGuard<'_, T> {
        self.acquire(None);
        RecursiveMutexGuard::new(self)
    }

    /// Acquire the lock, giving up after `timeout`.
    pub fn try_lock_for(&self, timeout: Duration) -> Option<RecursiveMutexGuard<'_, T>> {
        let deadline = Instant::now().checked_add(timeout);
        if self.acquire(Some(deadline)) {
            Some(RecursiveMutexGuard::new(self))
        } else {
            None
        }
    }

    /// Acquire the lock only if it is free or already held by this thread.
    pub fn try_lock(&self) -> Option<RecursiveMutexGuard<'_, T>> {
        self.try_lock_for(Duration::ZERO)
    }

    /// Whether the calling thread currently holds the lock.
    pub fn is_held_by_current_thread(&self) -> bool {
        self.ownership().holder == Some(thread::current().id())
    }

    /// Current nesting depth (0 when unlocked).
    pub fn depth(&self) -> usize {
        self.ownership().depth
    }

    /// Get a mutable reference to the value; no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    fn ownership(&self) -> MutexGuard<'_, Ownership> {
        self.ownership.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `deadline`: `None` = wait forever, `Some(None)` = deadline overflowed
    /// (treated as forever), `Some(Some(t))` = give up at `t`.
    ///
    /// Modeled by `LoomRecursiveLock` in `loom_tests.rs`; keep both in step.
    fn acquire(&self, deadline: Option<Option<Instant>>) -> bool {
        let me = thread::current().id();
        let mut owner = self.ownership();

        loop {
            match owner.holder {
                None => {
                    owner.holder = Some(me);
                    owner.depth = 1;
                    return true;
                }
                Some(holder) if holder == me => {
                    owner.depth += 1;
                    return true;
                }
                Some(_) => {}
            }

            owner = match deadline {
                None | Some(None) => self
                    .released
                    .wait(owner)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(Some(deadline)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.released
                        .wait_timeout(owner, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }

    fn release(&self) {
        let mut owner = self.ownership();
        debug_assert_eq!(owner.holder, Some(thread::current().id()));
        owner.depth -= 1;
        if owner.depth == 0 {
            owner.holder = None;
            drop(owner);
            self.released.notify_one();
        }
    }
}

impl<T: Default> Default for RecursiveMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized> fmt::Debug for RecursiveMutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self.ownership();
        f.debug_struct("RecursiveMutex")
            .field("holder", &owner.holder)
            .field("depth", &owner.depth)
            .finish_non_exhaustive()
    }
}

/// RAII guard for [`RecursiveMutex`]. Dropping it unlocks one level.
#[must_use = "if unused the RecursiveMutex will immediately unlock"]
pub struct RecursiveMutexGuard<'a, T: ?Sized> {
    mutex: &'a RecursiveMutex<T>,
    _not_send: PhantomData<*const ()>,
}

impl<'a, T: ?Sized> RecursiveMutexGuard<'a, T> {
    fn new(mutex: &'a RecursiveMutex<T>) -> Self {
        Self {
            mutex,
            _not_send: PhantomData,
        }
    }
}

impl<T: ?Sized> Deref for RecursiveMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: this thread holds the lock (invariant 1) and only shared
        // references are produced (invariant 2).
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T: ?Sized> Drop for RecursiveMutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.release();
    }
}

// SAFETY: sharing a guard between threads shares `&T`, which needs T: Sync.
unsafe impl<T: ?Sized + Sync> Sync for RecursiveMutexGuard<'_, T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for RecursiveMutexGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
