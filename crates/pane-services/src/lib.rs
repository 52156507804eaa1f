//! Pane Services
//!
//! This crate provides the runtime's lifecycle managers and its builtin
//! background services:
//!
//! - **Loader**: app stack, lifecycle transitions and result delivery
//! - **ServiceRegistry**: start/stop/lookup of background services
//! - **Screenshot Service**: captures frames to JSON files (timed or per app)
//! - **Sdcard Service**: polls the card and unmounts it after errors
//!
//! # Architecture
//!
//! Services are declared as `static` [`ServiceManifest`]s with optional
//! `on_start` / `on_stop` callbacks. Each running service has one
//! [`ServiceContext`] carrying its payload and a [`Runtime`] handle to the
//! shared gui, loader and hardware configuration.
//!
//! All app transitions happen under the gui's orchestration lock, so
//! lifecycle calls from different threads are serialized and callbacks may
//! re-enter the loader from the same thread.

#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod manifests;
pub mod registry;
pub mod runtime;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use context::ServiceContext;
pub use error::{LoaderError, ScreenshotError, ServiceError};
pub use loader::{Loader, LoaderEvent};
pub use manifest::ServiceManifest;
pub use registry::ServiceRegistry;
pub use runtime::Runtime;
pub use services::{screenshot, sdcard};
