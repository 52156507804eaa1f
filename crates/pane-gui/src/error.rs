//! Gui error types

use core::fmt;

use pane_render::RenderError;

/// Errors reported by the gui
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuiError {
    /// The render lock could not be acquired in time
    RenderLockTimeout,
    /// Widget tree operation failed
    Render(RenderError),
    /// The gui thread could not be spawned
    ThreadSpawn(String),
    /// The gui thread is already running
    AlreadyStarted,
    /// The input queue is full; the event was dropped
    InputQueueFull,
}

impl fmt::Display for GuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuiError::RenderLockTimeout => write!(f, "Render lock timed out"),
            GuiError::Render(e) => write!(f, "Render error: {}", e),
            GuiError::ThreadSpawn(msg) => write!(f, "Failed to spawn gui thread: {}", msg),
            GuiError::AlreadyStarted => write!(f, "Gui thread already running"),
            GuiError::InputQueueFull => write!(f, "Input queue full"),
        }
    }
}

impl std::error::Error for GuiError {}

impl From<RenderError> for GuiError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::LockTimeout => GuiError::RenderLockTimeout,
            other => GuiError::Render(other),
        }
    }
}
