//! Renderable representation of the foreground app

use std::sync::Arc;

use pane_apps::AppContext;
use pane_render::{NodeId, WidgetTree};

/// The foreground app as seen by the draw pass.
///
/// `show` is handed an empty container on every redraw and must rebuild the
/// whole view into it.
#[derive(Clone, Debug)]
pub struct ViewPort {
    app: Arc<AppContext>,
}

impl ViewPort {
    pub fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &Arc<AppContext> {
        &self.app
    }

    /// Run the app's `on_show` into `container`.
    pub(crate) fn show(&self, tree: &mut WidgetTree, container: NodeId) {
        if let Some(on_show) = self.app.manifest().on_show {
            on_show(&self.app, tree, container);
        }
    }

    /// Run the app's `on_hide`.
    pub(crate) fn hide(&self) {
        if let Some(on_hide) = self.app.manifest().on_hide {
            on_hide(&self.app);
        }
    }
}
