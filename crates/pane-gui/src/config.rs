//! Gui configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// When to create the on-screen keyboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardMode {
    /// Only with a touch driver and no attached hardware keyboard
    #[default]
    Auto,
    Enabled,
    Disabled,
}

/// Gui tuning, part of the runtime configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// How long the draw pass waits for the render lock
    pub render_lock_timeout_ms: u64,
    /// Pending input events before new ones are dropped
    pub input_queue_capacity: usize,
    pub keyboard: KeyboardMode,
}

impl GuiConfig {
    pub fn render_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.render_lock_timeout_ms)
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            render_lock_timeout_ms: 1000,
            input_queue_capacity: 32,
            keyboard: KeyboardMode::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GuiConfig::default();
        assert_eq!(config.render_lock_timeout(), Duration::from_secs(1));
        assert_eq!(config.input_queue_capacity, 32);
        assert_eq!(config.keyboard, KeyboardMode::Auto);
    }

    #[test]
    fn test_partial_json() {
        let config: GuiConfig = serde_json::from_str(r#"{"keyboard":"disabled"}"#).unwrap();
        assert_eq!(config.keyboard, KeyboardMode::Disabled);
        assert_eq!(config.render_lock_timeout_ms, 1000);
    }
}
