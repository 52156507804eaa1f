//! Running app instances
//!
//! An [`AppContext`] is created by the loader when an app starts and dropped
//! after `on_stop`. It is shared (`Arc`) between the loader's app stack and
//! whatever callbacks are running, so all mutable state sits behind short
//! internal locks that are never held while calling out.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pane_render::Renderer;

use crate::bundle::{AppResult, Bundle};
use crate::error::AppError;
use crate::manifest::AppManifest;

/// Opaque per-instance payload
pub type AppData = Arc<dyn Any + Send + Sync>;

/// Lifecycle state of one app instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Stopped,
    /// `on_start` is running
    Starting,
    /// Owns the screen
    Shown,
    /// Another app is on top
    Hidden,
    /// `on_stop` is running
    Stopping,
}

/// Presentation flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    /// Show the status bar above the app
    pub show_statusbar: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            show_statusbar: true,
        }
    }
}

/// What an app can ask of the runtime that hosts it.
///
/// Implemented by the loader. Calls may be made from any thread, including
/// from inside lifecycle callbacks.
pub trait AppHost: Send + Sync {
    /// Start `id` on top of the current app.
    fn start_app(&self, id: &str, parameters: Option<Bundle>) -> Result<(), AppError>;

    /// Stop the current app.
    fn stop_app(&self) -> Result<(), AppError>;

    /// Schedule a redraw of the current app.
    fn request_draw(&self);

    /// The render engine, for updating widgets outside of `on_show`.
    fn renderer(&self) -> Option<Arc<Renderer>>;
}

struct Pending {
    result: AppResult,
    bundle: Option<Bundle>,
}

/// A running app instance.
pub struct AppContext {
    manifest: &'static AppManifest,
    parameters: Option<Bundle>,
    data: Mutex<Option<AppData>>,
    flags: Mutex<Flags>,
    state: Mutex<AppState>,
    result: Mutex<Option<Pending>>,
    host: Arc<dyn AppHost>,
}

impl AppContext {
    pub fn new(
        manifest: &'static AppManifest,
        parameters: Option<Bundle>,
        host: Arc<dyn AppHost>,
    ) -> Self {
        Self {
            manifest,
            parameters,
            data: Mutex::new(None),
            flags: Mutex::new(Flags::default()),
            state: Mutex::new(AppState::Stopped),
            result: Mutex::new(None),
            host,
        }
    }

    pub fn manifest(&self) -> &'static AppManifest {
        self.manifest
    }

    /// Shorthand for `manifest().id`
    pub fn id(&self) -> &'static str {
        self.manifest.id
    }

    /// Launch parameters, if any were given
    pub fn parameters(&self) -> Option<&Bundle> {
        self.parameters.as_ref()
    }

    // =========================================================================
    // App data
    // =========================================================================

    /// Attach the app's payload, replacing any previous one.
    pub fn set_data<T: Any + Send + Sync>(&self, data: Arc<T>) {
        *lock(&self.data) = Some(data);
    }

    /// The payload as `T`; `None` if unset or of another type.
    pub fn data<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let data = lock(&self.data).clone()?;
        data.downcast::<T>().ok()
    }

    /// Drop the payload.
    pub fn clear_data(&self) {
        lock(&self.data).take();
    }

    // =========================================================================
    // Flags & state
    // =========================================================================

    pub fn flags(&self) -> Flags {
        *lock(&self.flags)
    }

    /// Takes effect on the next redraw.
    pub fn set_flags(&self, flags: Flags) {
        *lock(&self.flags) = flags;
    }

    pub fn state(&self) -> AppState {
        *lock(&self.state)
    }

    /// Record a lifecycle transition. Driven by the loader.
    pub fn set_state(&self, state: AppState) {
        *lock(&self.state) = state;
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Set the result handed to the parent app when this one stops.
    pub fn set_result(&self, result: AppResult, bundle: Option<Bundle>) {
        *lock(&self.result) = Some(Pending { result, bundle });
    }

    pub fn has_result(&self) -> bool {
        lock(&self.result).is_some()
    }

    /// Remove the pending result. Called by the loader on stop.
    pub fn take_result(&self) -> Option<(AppResult, Option<Bundle>)> {
        lock(&self.result)
            .take()
            .map(|pending| (pending.result, pending.bundle))
    }

    // =========================================================================
    // Host access
    // =========================================================================

    /// Start another app on top of this one.
    pub fn start_app(&self, id: &str, parameters: Option<Bundle>) -> Result<(), AppError> {
        self.host.start_app(id, parameters)
    }

    /// Stop the current app (normally this one).
    pub fn stop(&self) -> Result<(), AppError> {
        self.host.stop_app()
    }

    pub fn request_draw(&self) {
        self.host.request_draw();
    }

    pub fn renderer(&self) -> Option<Arc<Renderer>> {
        self.host.renderer()
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("id", &self.manifest.id)
            .field("state", &self.state())
            .field("flags", &self.flags())
            .field("has_data", &lock(&self.data).is_some())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
