//! Pane Synchronization Primitives
//!
//! Thin wrappers over the platform threading primitives that every higher
//! layer of Pane builds on. This crate contains ALL unsafe code of the
//! runtime, consolidated into a single auditable location. Other crates use
//! `#![forbid(unsafe_code)]`.
//!
//! # Module Organization
//!
//! - `recursive` - Reentrant mutex (holder thread + depth counter)
//! - `timed` - Mutex whose acquisition is bounded by a timeout
//! - `event_flags` - Bit flags a thread can block on (used by the gui thread)
//! - `queue` - Bounded message queue with timed put/get
//! - `timer` - One-shot and periodic timers running on their own thread
//! - `loom_tests` - Concurrency tests using loom (with `loom` feature)
//!
//! # Timeouts
//!
//! Only the recursive mutex offers an unbounded `lock()`. Everything that
//! guards a shared resource across subsystems is acquired with a timeout, and
//! callers must treat a timeout as a recoverable, loggable condition.
//!
//! # Verification
//!
//! 1. **Loom tests** (`cargo test --features loom`): ownership protocol of the
//!    recursive mutex under all interleavings
//! 2. **Unit tests**: blocking and timeout behavior with real threads

pub mod error;
pub mod event_flags;
pub mod queue;
pub mod recursive;
pub mod timed;
pub mod timer;


pub use error::SyncError;
pub use event_flags::EventFlags;
pub use queue::MessageQueue;
pub use recursive::{RecursiveMutex, RecursiveMutexGuard};
pub use timed::{TimedMutex, TimedMutexGuard};
pub use timer::{Timer, TimerType};

use std::time::Duration;

/// Convert a millisecond count into a `Duration`.
///
/// Mirrors the tick-based timeouts used by board code.
#[inline]
pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
