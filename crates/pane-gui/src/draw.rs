//! Draw pass

use pane_hal::SdCardState;
use pane_render::{NodeId, NodeKind, RenderError, WidgetTree};

use crate::gui::{Gui, TAG};

/// Result of one [`Gui::redraw`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The app's `on_show` rebuilt the view
    Drawn { app: &'static str },
    /// No app is current; the app root was left empty
    NothingToDraw,
    /// The app views could not be built; the app root was left empty
    Failed,
    /// The render lock timed out; the tree was not touched
    Skipped,
}

impl Gui {
    /// Rebuild the screen for the current app.
    ///
    /// Runs on the gui thread after [`request_draw`](Self::request_draw);
    /// callable directly as well. Takes the orchestration lock, then the
    /// render lock with the configured timeout.
    pub fn redraw(&self) -> DrawOutcome {
        let state = self.state.lock();

        let timeout = self.config.render_lock_timeout();
        let mut tree = match self.renderer.lock(timeout) {
            Ok(tree) => tree,
            Err(_) => {
                log::error!(target: TAG, "render lock not acquired within {:?}, skipping frame", timeout);
                return DrawOutcome::Skipped;
            }
        };

        let view_port = state.borrow().view_port.clone();

        // Cleaning the app root also deletes the previous keyboard
        self.set_keyboard(None);
        if let Err(e) = tree.clean(self.app_root) {
            log::error!(target: TAG, "failed to clean app root: {}", e);
        }

        let outcome = match view_port {
            Some(view_port) => {
                let app = view_port.app();
                let show_statusbar = app.flags().show_statusbar;
                if let Err(e) = self.update_statusbar(&mut tree, show_statusbar) {
                    log::warn!(target: TAG, "statusbar update failed: {}", e);
                }

                match self.create_app_views(&mut tree) {
                    Ok(container) => {
                        view_port.show(&mut tree, container);
                        DrawOutcome::Drawn { app: app.id() }
                    }
                    Err(e) => {
                        log::error!(target: TAG, "failed to create app views: {}", e);
                        DrawOutcome::Failed
                    }
                }
            }
            None => {
                log::warn!(target: TAG, "nothing to draw");
                DrawOutcome::NothingToDraw
            }
        };

        drop(tree);
        drop(state);

        // The tree changed unless the lock timed out
        if outcome != DrawOutcome::Skipped {
            self.advance_frame();
        }
        outcome
    }

    /// Fresh app container, plus a hidden keyboard when enabled.
    fn create_app_views(&self, tree: &mut WidgetTree) -> Result<NodeId, RenderError> {
        let container = tree.create(self.app_root, NodeKind::Container)?;
        tree.set_flex_grow(container, 1)?;

        if self.keyboard_is_enabled() {
            let keyboard = tree.create(self.app_root, NodeKind::Keyboard)?;
            tree.set_hidden(keyboard, true)?;
            self.set_keyboard(Some(keyboard));
        }

        Ok(container)
    }

    fn update_statusbar(&self, tree: &mut WidgetTree, visible: bool) -> Result<(), RenderError> {
        tree.set_hidden(self.statusbar, !visible)?;
        tree.clean(self.statusbar)?;
        if !visible {
            return Ok(());
        }

        if let Some(sdcard) = self.hardware.sdcard() {
            if sdcard.state() == SdCardState::Mounted {
                tree.create_label(self.statusbar, "SD")?;
            }
        }
        if let Some(power) = self.hardware.power() {
            let level = format!("{}%", power.charge_level());
            tree.create_label(self.statusbar, &level)?;
        }
        Ok(())
    }
}
