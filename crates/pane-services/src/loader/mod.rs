//! App Loader
//!
//! Owns the app stack and drives every lifecycle transition:
//!
//! ```text
//! Stopped → Starting → Shown ⇄ Hidden → Stopping → Stopped
//! ```
//!
//! Every transition runs while holding the gui's orchestration lock. The
//! stack itself sits behind a short internal lock that is never held while
//! a callback runs, so callbacks can start or stop apps (same thread,
//! reentrant orchestration lock).
//!
//! # Restart
//!
//! Starting an app that already has an instance on the stack first unwinds
//! the stack down to and including that instance; there are never two
//! instances of one app.

mod host;

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pane_apps::{AppContext, AppHost, AppRegistry, AppState, Bundle};
use pane_gui::Gui;
use pane_pubsub::PubSub;

use crate::error::LoaderError;

use host::LoaderHost;

const TAG: &str = "loader";

/// Lifecycle notifications published on [`Loader::pubsub`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderEvent {
    /// `on_start` has returned
    AppStarted { id: &'static str },
    /// The app became the foreground app
    AppShowing { id: &'static str },
    /// The app is about to lose the screen
    AppHiding { id: &'static str },
    /// `on_stop` has returned and the context is gone
    AppStopped { id: &'static str },
}

/// App lifecycle manager.
pub struct Loader {
    apps: AppRegistry,
    gui: Arc<Gui>,
    /// Bottom to top; the top is the current app
    stack: Mutex<Vec<Arc<AppContext>>>,
    pubsub: PubSub<LoaderEvent>,
    host: Arc<dyn AppHost>,
}

impl Loader {
    pub fn new(apps: AppRegistry, gui: Arc<Gui>) -> Arc<Self> {
        Arc::new_cyclic(|loader| Self {
            apps,
            gui,
            stack: Mutex::new(Vec::new()),
            pubsub: PubSub::new(),
            host: Arc::new(LoaderHost::new(loader.clone())),
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start app `id` without parameters.
    pub fn start_app(&self, id: &str) -> Result<(), LoaderError> {
        self.start_app_with(id, None)
    }

    /// Start app `id` on top of the stack.
    ///
    /// `on_start` runs synchronously on the calling thread. The app is
    /// shown afterwards unless `on_start` started another app on top of it
    /// (it then waits hidden) or stopped it.
    pub fn start_app_with(&self, id: &str, parameters: Option<Bundle>) -> Result<(), LoaderError> {
        let Some(manifest) = self.apps.find(id) else {
            log::warn!(target: TAG, "app {} not found", id);
            return Err(LoaderError::AppNotFound(id.to_string()));
        };

        let _gui = self.gui.lock();

        if self.stack().iter().any(|app| app.id() == manifest.id) {
            log::info!(target: TAG, "{} already running, restarting", manifest.id);
            self.unwind_to(manifest.id);
        }

        if let Some(current) = self.current_app() {
            if current.state() == AppState::Shown {
                self.hide(&current);
            }
        }

        log::info!(target: TAG, "start {}", manifest.id);
        let app = Arc::new(AppContext::new(manifest, parameters, Arc::clone(&self.host)));
        app.set_state(AppState::Starting);
        self.stack().push(Arc::clone(&app));

        if let Some(on_start) = manifest.on_start {
            on_start(&app);
        }
        // on_start may have stopped the app already
        if app.state() != AppState::Stopped {
            self.pubsub.publish(&LoaderEvent::AppStarted { id: manifest.id });
        }

        if app.state() == AppState::Starting {
            if self.is_current(&app) {
                self.show(&app);
            } else {
                // on_start launched another app on top
                app.set_state(AppState::Hidden);
            }
        }
        Ok(())
    }

    /// Stop the current app.
    ///
    /// The app underneath is shown again and receives the stopped app's
    /// result through `on_result`, if one was set.
    pub fn stop_app(&self) -> Result<(), LoaderError> {
        let _gui = self.gui.lock();

        let Some(app) = self.current_app() else {
            log::warn!(target: TAG, "stop_app: no app running");
            return Err(LoaderError::NoAppRunning);
        };

        self.stop_instance(&app);
        let result = app.take_result();

        if let Some(parent) = self.current_app() {
            if parent.state() != AppState::Shown {
                self.show(&parent);
            }
            if let (Some((result, bundle)), Some(on_result)) = (result, parent.manifest().on_result) {
                log::debug!(target: TAG, "{} result {:?} -> {}", app.id(), result, parent.id());
                on_result(&parent, result, bundle.as_ref());
            }
        }
        Ok(())
    }

    /// Stop every app, top of the stack first. No results are delivered.
    pub fn stop_all(&self) {
        let _gui = self.gui.lock();
        while let Some(app) = self.current_app() {
            self.stop_instance(&app);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The app on top of the stack
    pub fn current_app(&self) -> Option<Arc<AppContext>> {
        self.stack().last().cloned()
    }

    /// Payload of the current app, only if it is `expected_id` and the
    /// payload is a `T`.
    pub fn app_data<T: Any + Send + Sync>(&self, expected_id: &str) -> Option<Arc<T>> {
        let app = self.current_app()?;
        if app.id() != expected_id {
            return None;
        }
        app.data::<T>()
    }

    /// Contexts on the stack, bottom to top
    pub fn contexts(&self) -> Vec<Arc<AppContext>> {
        self.stack().clone()
    }

    /// Ids on the stack, bottom to top
    pub fn running_apps(&self) -> Vec<&'static str> {
        self.stack().iter().map(|app| app.id()).collect()
    }

    /// Lifecycle notifications
    pub fn pubsub(&self) -> &PubSub<LoaderEvent> {
        &self.pubsub
    }

    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    pub fn gui(&self) -> &Arc<Gui> {
        &self.gui
    }

    // =========================================================================
    // Transitions (orchestration lock held)
    // =========================================================================

    fn show(&self, app: &Arc<AppContext>) {
        app.set_state(AppState::Shown);
        self.gui.show_app(Arc::clone(app));
        self.pubsub.publish(&LoaderEvent::AppShowing { id: app.id() });
    }

    fn hide(&self, app: &Arc<AppContext>) {
        self.pubsub.publish(&LoaderEvent::AppHiding { id: app.id() });
        self.gui.hide_app();
        app.set_state(AppState::Hidden);
    }

    /// Hide if shown, run `on_stop`, drop from the stack.
    fn stop_instance(&self, app: &Arc<AppContext>) {
        log::info!(target: TAG, "stop {}", app.id());
        if app.state() == AppState::Shown {
            self.hide(app);
        }

        app.set_state(AppState::Stopping);
        if let Some(on_stop) = app.manifest().on_stop {
            on_stop(app);
        }
        self.stack().retain(|other| !Arc::ptr_eq(other, app));
        app.set_state(AppState::Stopped);
        self.pubsub.publish(&LoaderEvent::AppStopped { id: app.id() });
    }

    /// Stop apps from the top down to and including the instance of `id`.
    fn unwind_to(&self, id: &str) {
        while let Some(top) = self.current_app() {
            let reached = top.id() == id;
            self.stop_instance(&top);
            if reached {
                break;
            }
        }
    }

    fn is_current(&self, app: &Arc<AppContext>) -> bool {
        self.stack().last().is_some_and(|top| Arc::ptr_eq(top, app))
    }

    fn stack(&self) -> MutexGuard<'_, Vec<Arc<AppContext>>> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("stack", &self.running_apps())
            .finish_non_exhaustive()
    }
}
