//! Pane App Framework
//!
//! Apps are declared as `static` [`AppManifest`]s: an identifier, a display
//! name and a set of optional lifecycle callbacks. The loader creates an
//! [`AppContext`] for each running instance and drives the callbacks.
//!
//! # Lifecycle
//!
//! ```text
//! Stopped → Starting → Shown ⇄ Hidden → Stopping → Stopped
//! ```
//!
//! - `on_start`: the context exists; allocate app data here
//! - `on_show`: populate the container node handed over by the gui
//! - `on_hide`: the view is about to be torn down
//! - `on_result`: a child app launched from this one has finished
//! - `on_stop`: release everything
//!
//! Absent callbacks are no-ops.
//!
//! # Module Organization
//!
//! - `manifest` - Static app declaration
//! - `context` - Running instance state and the host interface
//! - `bundle` - Launch parameters and results
//! - `registry` - Lookup of manifests by id
//! - `toolbar` - Standard title bar widget
//! - `apps` - Builtin apps

#![forbid(unsafe_code)]

pub mod apps;
pub mod bundle;
pub mod context;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod toolbar;

pub use bundle::{AppResult, Bundle};
pub use context::{AppContext, AppHost, AppState, Flags};
pub use error::{AppError, RegistryError};
pub use manifest::{AppManifest, AppType, OnLifecycle, OnResult, OnShow};
pub use registry::AppRegistry;
