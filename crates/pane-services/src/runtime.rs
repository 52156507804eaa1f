//! Handles to the shared runtime components

use std::fmt;
use std::sync::Arc;

use pane_gui::Gui;
use pane_hal::Configuration;

use crate::loader::Loader;

/// What a service can reach. Cheap to clone.
#[derive(Clone)]
pub struct Runtime {
    configuration: Arc<Configuration>,
    gui: Arc<Gui>,
    loader: Arc<Loader>,
}

impl Runtime {
    pub fn new(configuration: Arc<Configuration>, gui: Arc<Gui>, loader: Arc<Loader>) -> Self {
        Self {
            configuration,
            gui,
            loader,
        }
    }

    /// The boot-resolved hardware configuration
    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    pub fn gui(&self) -> &Arc<Gui> {
        &self.gui
    }

    pub fn loader(&self) -> &Arc<Loader> {
        &self.loader
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}
