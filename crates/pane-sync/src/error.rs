//! Error types for synchronization primitives

use std::fmt;

/// Errors reported by the primitives in this crate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncError {
    /// The operation did not complete within its timeout
    Timeout,

    /// The OS refused to create a worker thread
    ThreadSpawn(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Timeout => write!(f, "Operation timed out"),
            SyncError::ThreadSpawn(msg) => write!(f, "Failed to spawn thread: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}
