//! Loader access for apps

use std::sync::{Arc, Weak};

use pane_apps::{AppError, AppHost, Bundle};
use pane_render::Renderer;

use super::Loader;

/// [`AppHost`] handed to every app context.
///
/// Holds the loader weakly: contexts live on the loader's stack.
pub(super) struct LoaderHost {
    loader: Weak<Loader>,
}

impl LoaderHost {
    pub(super) fn new(loader: Weak<Loader>) -> Self {
        Self { loader }
    }

    fn loader(&self) -> Result<Arc<Loader>, AppError> {
        self.loader.upgrade().ok_or(AppError::HostUnavailable)
    }
}

impl AppHost for LoaderHost {
    fn start_app(&self, id: &str, parameters: Option<Bundle>) -> Result<(), AppError> {
        Ok(self.loader()?.start_app_with(id, parameters)?)
    }

    fn stop_app(&self) -> Result<(), AppError> {
        Ok(self.loader()?.stop_app()?)
    }

    fn request_draw(&self) {
        if let Ok(loader) = self.loader() {
            loader.gui().request_draw();
        }
    }

    fn renderer(&self) -> Option<Arc<Renderer>> {
        let loader = self.loader().ok()?;
        let renderer = Arc::clone(loader.gui().renderer());
        Some(renderer)
    }
}
