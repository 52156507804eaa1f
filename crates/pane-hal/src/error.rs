//! HAL error types

use core::fmt;

/// Errors reported by drivers and board resolution
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// Operation not supported by this driver
    NotSupported,
    /// Storage is not mounted
    NotMounted,
    /// Storage is already mounted
    AlreadyMounted,
    /// Driver-level I/O failure
    Io(String),
    /// The board's boot hook failed
    BootFailed(String),
    /// No board registered under this name
    UnknownBoard(String),
    /// A board with this name is already registered
    DuplicateBoard(String),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::NotSupported => write!(f, "Operation not supported"),
            HalError::NotMounted => write!(f, "Storage not mounted"),
            HalError::AlreadyMounted => write!(f, "Storage already mounted"),
            HalError::Io(msg) => write!(f, "I/O error: {}", msg),
            HalError::BootFailed(msg) => write!(f, "Hardware boot failed: {}", msg),
            HalError::UnknownBoard(name) => write!(f, "Unknown board: {}", name),
            HalError::DuplicateBoard(name) => write!(f, "Board already registered: {}", name),
        }
    }
}

impl std::error::Error for HalError {}
