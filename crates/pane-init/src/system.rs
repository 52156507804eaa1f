//! The running system

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pane_apps::{AppManifest, AppRegistry};
use pane_gui::Gui;
use pane_hal::{Board, BoardRegistry, Configuration};
use pane_render::Renderer;
use pane_services::{manifests, screenshot, Loader, Runtime, ServiceManifest, ServiceRegistry};

use crate::config::RuntimeConfig;
use crate::error::BootError;

const TAG: &str = "init";

/// Surface size used when the board has no display driver
pub const DEFAULT_RESOLUTION: (u32, u32) = (320, 240);

/// A booted runtime. Dropping it shuts it down.
pub struct System {
    board_name: String,
    config: RuntimeConfig,
    runtime: Runtime,
    services: ServiceRegistry,
    shut_down: AtomicBool,
}

impl System {
    /// Boot `board` with the builtin apps and services plus `apps` and `services`.
    pub fn boot(
        board: &dyn Board,
        config: RuntimeConfig,
        apps: &[&'static AppManifest],
        services: &[&'static ServiceManifest],
    ) -> Result<Self, BootError> {
        log::info!(target: TAG, "booting {}", board.name());

        // 1. Hardware
        let configuration = Arc::new(board.configuration());
        configuration.init_hardware()?;

        // 2. Rendering
        let (width, height) = resolution(&configuration);
        let renderer = Arc::new(Renderer::new(width, height));
        let gui = Arc::new(Gui::new(
            renderer,
            Arc::clone(&configuration),
            config.gui.clone(),
        )?);

        // 3. Apps
        let app_registry = AppRegistry::new(
            pane_apps::apps::builtin()
                .into_iter()
                .chain(apps.iter().copied()),
        )?;
        let loader = Loader::new(app_registry, Arc::clone(&gui));

        // 4. Services
        let runtime = Runtime::new(configuration, Arc::clone(&gui), loader);
        let service_registry = ServiceRegistry::new(
            manifests::builtin()
                .into_iter()
                .chain(services.iter().copied()),
            runtime.clone(),
        )?;

        let system = Self {
            board_name: board.name().to_string(),
            config,
            runtime,
            services: service_registry,
            shut_down: AtomicBool::new(false),
        };

        // 5. Gui thread; on error below, dropping `system` shuts it down
        system.runtime.gui().start()?;
        system.start(services)?;

        log::info!(target: TAG, "boot complete");
        Ok(system)
    }

    /// Boot the board registered under `name`.
    pub fn boot_from_registry(
        boards: &BoardRegistry,
        name: &str,
        config: RuntimeConfig,
        apps: &[&'static AppManifest],
        services: &[&'static ServiceManifest],
    ) -> Result<Self, BootError> {
        let board = boards.resolve(name)?;
        Self::boot(board.as_ref(), config, apps, services)
    }

    /// Steps 6 and 7: services and the boot app
    fn start(&self, user_services: &[&'static ServiceManifest]) -> Result<(), BootError> {
        if self.config.auto_start_services {
            let ids = manifests::builtin()
                .into_iter()
                .chain(user_services.iter().copied())
                .map(|manifest| manifest.id);
            for id in ids {
                self.services.start_service(id)?;
            }
        } else {
            log::info!(target: TAG, "service auto-start disabled");
        }

        if let Some(path) = &self.config.screenshot_path {
            match screenshot::opt_service(&self.services) {
                Some(service) => {
                    if let Err(e) = service.start_apps(path) {
                        log::warn!(target: TAG, "screenshot capture not started: {}", e);
                    }
                }
                None => log::warn!(target: TAG, "screenshot_path set but service not running"),
            }
        }

        if let Some(id) = &self.config.boot_app {
            self.runtime.loader().start_app(id)?;
        }
        Ok(())
    }

    /// Stop every app, then every service, then the gui thread.
    ///
    /// Only the first call does anything.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        log::info!(target: TAG, "shutting down");
        self.runtime.loader().stop_all();
        self.services.stop_all();
        self.runtime.gui().stop();
        log::info!(target: TAG, "shutdown complete");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub fn board_name(&self) -> &str {
        &self.board_name
    }

    /// The single, read-only hardware configuration
    pub fn configuration(&self) -> &Arc<Configuration> {
        self.runtime.configuration()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn gui(&self) -> &Arc<Gui> {
        self.runtime.gui()
    }

    pub fn loader(&self) -> &Arc<Loader> {
        self.runtime.loader()
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

impl Drop for System {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("board", &self.board_name)
            .field("apps", &self.loader().running_apps())
            .field("services", &self.services.running_services())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

fn resolution(configuration: &Configuration) -> (u32, u32) {
    match configuration.display() {
        Some(display) => (display.width(), display.height()),
        None => {
            log::info!(target: TAG, "no display, using {}x{}", DEFAULT_RESOLUTION.0, DEFAULT_RESOLUTION.1);
            DEFAULT_RESOLUTION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pane_hal_mock::MockDisplay;

    #[test]
    fn test_resolution_from_display() {
        let configuration = Configuration::new().with_display(Arc::new(MockDisplay::new(480, 320)));
        assert_eq!(resolution(&configuration), (480, 320));
    }

    #[test]
    fn test_resolution_without_display() {
        assert_eq!(resolution(&Configuration::new()), DEFAULT_RESOLUTION);
    }
}
