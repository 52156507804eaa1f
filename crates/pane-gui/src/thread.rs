//! The gui thread

use std::sync::{Arc, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::GuiError;
use crate::gui::{Gui, FLAG_ALL, FLAG_DRAW, FLAG_EXIT, FLAG_INPUT, TAG};

impl Gui {
    /// Spawn the `gui` thread.
    pub fn start(self: &Arc<Self>) -> Result<(), GuiError> {
        let mut slot = self.thread_slot();
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            log::warn!(target: TAG, "gui thread already running");
            return Err(GuiError::AlreadyStarted);
        }

        self.flags.clear(FLAG_EXIT);
        let gui = Arc::clone(self);
        let handle = thread::Builder::new()
            .name(String::from("gui"))
            .spawn(move || gui.run())
            .map_err(|e| GuiError::ThreadSpawn(e.to_string()))?;

        *slot = Some(handle);
        log::info!(target: TAG, "gui thread started");
        Ok(())
    }

    /// Stop the `gui` thread and wait for it to exit. No-op if not running.
    pub fn stop(&self) {
        let Some(handle) = self.thread_slot().take() else {
            return;
        };

        self.flags.set(FLAG_EXIT);
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            log::error!(target: TAG, "gui thread panicked");
        }
        log::info!(target: TAG, "gui thread stopped");
    }

    pub fn is_running(&self) -> bool {
        self.thread_slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn run(&self) {
        loop {
            let Some(flags) = self.flags.wait_any(FLAG_ALL, None) else {
                continue;
            };
            if flags & FLAG_EXIT != 0 {
                break;
            }
            if flags & FLAG_INPUT != 0 {
                self.dispatch_input();
            }
            if flags & FLAG_DRAW != 0 {
                self.redraw();
            }
        }
    }

    fn thread_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.thread.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
