//! Boot errors

use core::fmt;

use pane_apps::RegistryError;
use pane_gui::GuiError;
use pane_hal::HalError;
use pane_services::{LoaderError, ServiceError};

/// Why the runtime could not come up
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootError {
    /// Board lookup or hardware boot hook failed
    Hal(HalError),
    Gui(GuiError),
    /// App table rejected
    Apps(RegistryError),
    /// Service table rejected, or a service failed to start
    Service(ServiceError),
    /// The boot app could not be started
    Loader(LoaderError),
    /// Malformed runtime configuration
    Config(String),
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::Hal(e) => write!(f, "Hardware: {}", e),
            BootError::Gui(e) => write!(f, "Gui: {}", e),
            BootError::Apps(e) => write!(f, "Apps: {}", e),
            BootError::Service(e) => write!(f, "Services: {}", e),
            BootError::Loader(e) => write!(f, "Boot app: {}", e),
            BootError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for BootError {}

impl From<HalError> for BootError {
    fn from(e: HalError) -> Self {
        BootError::Hal(e)
    }
}

impl From<GuiError> for BootError {
    fn from(e: GuiError) -> Self {
        BootError::Gui(e)
    }
}

impl From<RegistryError> for BootError {
    fn from(e: RegistryError) -> Self {
        BootError::Apps(e)
    }
}

impl From<ServiceError> for BootError {
    fn from(e: ServiceError) -> Self {
        BootError::Service(e)
    }
}

impl From<LoaderError> for BootError {
    fn from(e: LoaderError) -> Self {
        BootError::Loader(e)
    }
}

impl From<serde_json::Error> for BootError {
    fn from(e: serde_json::Error) -> Self {
        BootError::Config(e.to_string())
    }
}
