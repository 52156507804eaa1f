//! Hardware Configuration Registry for Pane
//!
//! Boards describe their peripherals as a [`Configuration`]: one optional
//! driver per device category. Orchestration code only ever sees the driver
//! traits, so swapping a board never touches the runtime.
//!
//! # Device Categories
//!
//! - **Display**: the panel the widget tree is rendered onto
//! - **Touch**: pointer input attached to the display
//! - **SdCard**: removable storage with mount state
//! - **Power**: battery level and charging state
//! - **Keyboard**: a physical keyboard, if the device has one
//!
//! A missing driver means the feature is unavailable; consumers check for
//! `None` and degrade (the sdcard service, for example, does not start its
//! poll timer).
//!
//! The configuration is resolved once at boot through a [`BoardRegistry`]
//! and then shared read-only as `Arc<Configuration>`.

#![forbid(unsafe_code)]

mod board;
mod configuration;
mod drivers;
mod error;

pub use board::{Board, BoardRegistry};
pub use configuration::{Configuration, InitBoot};
pub use drivers::{Display, Keyboard, Power, SdCard, SdCardState, Touch, TouchPoint};
pub use error::HalError;
