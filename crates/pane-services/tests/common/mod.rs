//! Shared fixture: a mock board wired to a gui, loader and runtime.

#![allow(dead_code)]

use std::sync::Arc;

use pane_apps::{AppManifest, AppRegistry};
use pane_gui::{Gui, GuiConfig};
use pane_hal::Board;
use pane_hal_mock::MockBoard;
use pane_render::Renderer;
use pane_services::{Loader, Runtime};

pub struct Fixture {
    pub board: MockBoard,
    pub gui: Arc<Gui>,
    pub loader: Arc<Loader>,
    pub runtime: Runtime,
}

pub fn fixture(apps: &[&'static AppManifest]) -> Fixture {
    fixture_with(MockBoard::new(), apps)
}

pub fn fixture_with(board: MockBoard, apps: &[&'static AppManifest]) -> Fixture {
    let configuration = Arc::new(board.configuration());
    configuration.init_hardware().unwrap();

    let renderer = Arc::new(Renderer::new(320, 240));
    let gui = Arc::new(Gui::new(renderer, Arc::clone(&configuration), GuiConfig::default()).unwrap());
    let registry = AppRegistry::new(apps.iter().copied()).unwrap();
    let loader = Loader::new(registry, Arc::clone(&gui));
    let runtime = Runtime::new(configuration, Arc::clone(&gui), Arc::clone(&loader));

    Fixture {
        board,
        gui,
        loader,
        runtime,
    }
}
