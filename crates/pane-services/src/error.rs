//! Error types for the loader and services
//!
//! Every error here is also logged where it is produced; callers may ignore
//! the `Result` when the log line is enough.

use core::fmt;

use pane_apps::AppError;

/// Errors from app lifecycle operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoaderError {
    /// No manifest registered under this id
    AppNotFound(String),
    /// `stop_app` with an empty app stack
    NoAppRunning,
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::AppNotFound(id) => write!(f, "App not found: {}", id),
            LoaderError::NoAppRunning => write!(f, "No app running"),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<LoaderError> for AppError {
    fn from(e: LoaderError) -> Self {
        match e {
            LoaderError::AppNotFound(id) => AppError::AppNotFound(id),
            LoaderError::NoAppRunning => AppError::NoAppRunning,
        }
    }
}

/// Errors from service lifecycle operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceError {
    /// No manifest registered under this id
    NotFound(String),
    /// The service is already running
    AlreadyRunning(String),
    /// The service is not running
    NotRunning(String),
    /// Two manifests share an id
    DuplicateId(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound(id) => write!(f, "Service not found: {}", id),
            ServiceError::AlreadyRunning(id) => write!(f, "Service already running: {}", id),
            ServiceError::NotRunning(id) => write!(f, "Service not running: {}", id),
            ServiceError::DuplicateId(id) => write!(f, "Duplicate service id: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Errors from the screenshot service
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenshotError {
    /// The service lock was not acquired within its timeout
    LockTimeout,
    /// A capture task is still running
    AlreadyRunning,
    /// There is no capture task to stop
    NotRunning,
    /// The capture task could not be spawned
    TaskSpawn(String),
}

impl fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenshotError::LockTimeout => write!(f, "Screenshot service lock timed out"),
            ScreenshotError::AlreadyRunning => write!(f, "Screenshot task already running"),
            ScreenshotError::NotRunning => write!(f, "Screenshot task not running"),
            ScreenshotError::TaskSpawn(msg) => write!(f, "Failed to spawn screenshot task: {}", msg),
        }
    }
}

impl std::error::Error for ScreenshotError {}
