//! Event flags
//!
//! A 32-bit set of flags that producers set and a consumer thread waits on.
//! Setting a flag that is already set is a no-op, which gives natural
//! coalescing: ten draw requests before the consumer wakes up are one draw.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Flag set with blocking wait.
#[derive(Debug, Default)]
pub struct EventFlags {
    bits: Mutex<u32>,
    changed: Condvar,
}

impl EventFlags {
    /// Create an empty flag set.
    pub const fn new() -> Self {
        Self {
            bits: Mutex::new(0),
            changed: Condvar::new(),
        }
    }

    /// Set `flags` and wake waiters. Returns the resulting flag set.
    pub fn set(&self, flags: u32) -> u32 {
        let mut bits = self.bits();
        *bits |= flags;
        let result = *bits;
        drop(bits);
        self.changed.notify_all();
        result
    }

    /// Clear `flags`. Returns the flags that were set before clearing.
    pub fn clear(&self, flags: u32) -> u32 {
        let mut bits = self.bits();
        let before = *bits;
        *bits &= !flags;
        before
    }

    /// Current flag set.
    pub fn get(&self) -> u32 {
        *self.bits()
    }

    /// Wait until any flag in `mask` is set.
    ///
    /// The matching flags are cleared and returned. `None` means the timeout
    /// elapsed first; a `timeout` of `None` waits forever.
    pub fn wait_any(&self, mask: u32, timeout: Option<Duration>) -> Option<u32> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut bits = self.bits();

        loop {
            let matched = *bits & mask;
            if matched != 0 {
                *bits &= !matched;
                return Some(matched);
            }

            bits = match (timeout, deadline) {
                (Some(_), Some(deadline)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    self.changed
                        .wait_timeout(bits, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                _ => self
                    .changed
                    .wait(bits)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }

    fn bits(&self) -> MutexGuard<'_, u32> {
        self.bits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const DRAW: u32 = 1 << 0;
    const EXIT: u32 = 1 << 2;

    #[test]
    fn test_set_coalesces() {
        let flags = EventFlags::new();
        flags.set(DRAW);
        flags.set(DRAW);
        assert_eq!(flags.wait_any(DRAW, Some(Duration::ZERO)), Some(DRAW));
        assert_eq!(flags.wait_any(DRAW, Some(Duration::ZERO)), None);
    }

    #[test]
    fn test_wait_only_clears_matched() {
        let flags = EventFlags::new();
        flags.set(DRAW | EXIT);
        assert_eq!(flags.wait_any(EXIT, None), Some(EXIT));
        assert_eq!(flags.get(), DRAW);
    }

    #[test]
    fn test_wakes_waiting_thread() {
        let flags = Arc::new(EventFlags::new());
        let waiter = Arc::clone(&flags);
        let handle = thread::spawn(move || waiter.wait_any(DRAW | EXIT, Some(Duration::from_secs(5))));

        thread::sleep(Duration::from_millis(10));
        flags.set(EXIT);
        assert_eq!(handle.join().unwrap(), Some(EXIT));
    }
}
