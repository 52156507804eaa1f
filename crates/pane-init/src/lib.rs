//! Boot Sequence for Pane
//!
//! [`System::boot`] turns a board into a running runtime:
//!
//! 1. Resolve the board's hardware configuration and run its boot hook
//! 2. Create the renderer at the display's resolution, then the gui
//! 3. Register apps (builtins first) and create the loader
//! 4. Register services (builtins first) and the shared runtime handle
//! 5. Start the gui thread
//! 6. Start every declared service, unless disabled
//! 7. Start the boot app, if configured
//!
//! [`System::shutdown`] undoes steps 7 to 5 in reverse.

#![forbid(unsafe_code)]

// =============================================================================
// Module Organization
// =============================================================================

mod config;
mod error;
mod system;

pub use config::RuntimeConfig;
pub use error::BootError;
pub use system::{System, DEFAULT_RESOLUTION};
