//! Error types for the app framework

use core::fmt;

/// Errors an app sees when asking its host to start or stop apps
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    /// No manifest registered under this id
    AppNotFound(String),
    /// There is no running app to stop
    NoAppRunning,
    /// The loader has shut down
    HostUnavailable,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AppNotFound(id) => write!(f, "App not found: {}", id),
            AppError::NoAppRunning => write!(f, "No app running"),
            AppError::HostUnavailable => write!(f, "Loader unavailable"),
        }
    }
}

impl std::error::Error for AppError {}

/// Errors building an [`AppRegistry`](crate::AppRegistry)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Two manifests share an id
    DuplicateId(String),
    /// A manifest has an empty id
    EmptyId,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateId(id) => write!(f, "Duplicate app id: {}", id),
            RegistryError::EmptyId => write!(f, "App id must not be empty"),
        }
    }
}

impl std::error::Error for RegistryError {}
