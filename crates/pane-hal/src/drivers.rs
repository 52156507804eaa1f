//! Driver traits
//!
//! Every trait is `Send + Sync`: drivers are shared between the gui thread,
//! service timers and app callbacks.

use crate::error::HalError;

// =============================================================================
// Display & input
// =============================================================================

/// The panel the widget tree is rendered onto.
pub trait Display: Send + Sync {
    /// Driver name, for logs
    fn name(&self) -> &str;

    /// Horizontal resolution in pixels
    fn width(&self) -> u32;

    /// Vertical resolution in pixels
    fn height(&self) -> u32;

    /// Set backlight duty (0 = off, 255 = full)
    fn set_backlight(&self, _level: u8) -> Result<(), HalError> {
        Err(HalError::NotSupported)
    }
}

/// A single touch sample in display coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

/// Pointer input attached to the display.
pub trait Touch: Send + Sync {
    /// Driver name, for logs
    fn name(&self) -> &str;

    /// Current touch sample, `None` when released
    fn read(&self) -> Option<TouchPoint>;
}

/// A physical keyboard.
pub trait Keyboard: Send + Sync {
    /// Whether the keyboard is currently connected
    fn is_attached(&self) -> bool;
}

// =============================================================================
// Storage
// =============================================================================

/// Mount state of removable storage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdCardState {
    Mounted,
    Unmounted,
    /// The card reported an error, typically after unsafe ejection
    Error,
    Unknown,
}

/// Removable storage.
pub trait SdCard: Send + Sync {
    /// Current state, polled by the sdcard service
    fn state(&self) -> SdCardState;

    /// Mount the card at `path`.
    fn mount(&self, path: &str) -> Result<(), HalError>;

    /// Unmount the card.
    fn unmount(&self) -> Result<(), HalError>;

    /// Mount point while mounted
    fn mount_path(&self) -> Option<String>;
}

// =============================================================================
// Power
// =============================================================================

/// Battery and charger.
pub trait Power: Send + Sync {
    /// Charge level in percent (0..=100)
    fn charge_level(&self) -> u8;

    /// Whether external power is connected
    fn is_charging(&self) -> bool;
}
