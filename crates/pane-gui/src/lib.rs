//! GUI Synchronization & Draw Scheduler for Pane
//!
//! The [`Gui`] multiplexes one rendering surface between apps. It owns the
//! *orchestration lock* (reentrant, unbounded) guarding which app is
//! current, and drives the draw pass on its own `gui` thread.
//!
//! # Lock Order
//!
//! ```text
//! orchestration lock (Gui::lock)  →  render lock (Renderer::lock, bounded)
//! ```
//!
//! Never the other way around. Code that only touches widgets takes just
//! the render lock.
//!
//! # Draw Pass
//!
//! 1. Take the orchestration lock, then the render lock (bounded timeout)
//! 2. Clean the app root
//! 3. Toggle the status bar per the app's flags
//! 4. Create a fresh container (and a hidden keyboard when enabled)
//! 5. Hand the container to the app's `on_show`
//!
//! If the render lock times out the frame is skipped and the tree is left
//! untouched. The next `request_draw` tries again.
//!
//! # Gui Thread
//!
//! Blocks on event flags: `DRAW` (redraw), `INPUT` (dispatch queued input
//! events) and `EXIT`.

#![forbid(unsafe_code)]

mod config;
mod draw;
mod error;
mod gui;
mod input;
mod thread;
mod view_port;

pub use config::{GuiConfig, KeyboardMode};
pub use draw::DrawOutcome;
pub use error::GuiError;
pub use gui::{Gui, GuiLock};
pub use input::InputEvent;
pub use view_port::ViewPort;
