//! Runtime configuration

use std::path::PathBuf;

use pane_gui::GuiConfig;
use serde::{Deserialize, Serialize};

use crate::error::BootError;

/// Everything [`System::boot`](crate::System::boot) can be told.
///
/// Every field is optional in JSON:
///
/// ```
/// use pane_init::RuntimeConfig;
///
/// let config = RuntimeConfig::from_json(r#"{ "boot_app": "HelloWorld" }"#).unwrap();
/// assert_eq!(config.boot_app.as_deref(), Some("HelloWorld"));
/// assert!(config.auto_start_services);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// App started once the system is up
    pub boot_app: Option<String>,
    /// Start every declared service during boot
    pub auto_start_services: bool,
    pub gui: GuiConfig,
    /// When set, the screenshot service captures every app shown into this
    /// directory from boot on
    pub screenshot_path: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn from_json(json: &str) -> Result<Self, BootError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            boot_app: None,
            auto_start_services: true,
            gui: GuiConfig::default(),
            screenshot_path: None,
        }
    }
}
