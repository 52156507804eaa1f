//! Screenshot capture
//!
//! - Timed and per-app captures written to disk
//! - Start/stop contention rules

mod common;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use pane_apps::apps::hello_world;
use pane_render::FrameSnapshot;
use pane_services::screenshot::{capture_file, ScreenshotMode, ScreenshotService};
use pane_services::{test_utils, ScreenshotError};

use common::{fixture, Fixture};

fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pane-screenshot-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn running_fixture() -> (Fixture, ScreenshotService) {
    let f = fixture(&[&hello_world::MANIFEST]);
    f.gui.start().unwrap();
    let service = ScreenshotService::new(f.runtime.clone());
    (f, service)
}

fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    done()
}

fn read_snapshot(file: &Path) -> FrameSnapshot {
    let bytes = std::fs::read(file).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Capture
// =============================================================================

#[test]
fn test_timed_capture_writes_numbered_files() {
    let (f, service) = running_fixture();
    let dir = output_dir("timed");
    f.loader.start_app("HelloWorld").unwrap();

    service.start_timed(&dir, 0, 2).unwrap();
    assert_eq!(service.mode(), ScreenshotMode::Timed);
    assert!(wait_until(Duration::from_secs(10), || !service.is_task_started()));

    for n in ["1", "2"] {
        let snapshot = read_snapshot(&capture_file(&dir, n));
        assert_eq!((snapshot.width, snapshot.height), (320, 240));
        assert!(snapshot.root.contains_text(hello_world::GREETING));
    }
    assert!(!capture_file(&dir, "3").exists());

    service.stop().unwrap();
    f.gui.stop();
}

#[test]
fn test_apps_capture_once_per_app() {
    let (f, service) = running_fixture();
    let dir = output_dir("apps");

    service.start_apps(&dir).unwrap();
    assert_eq!(service.mode(), ScreenshotMode::Apps);
    f.loader.start_app("HelloWorld").unwrap();

    let file = capture_file(&dir, "HelloWorld");
    assert!(wait_until(Duration::from_secs(10), || file.exists()));
    assert!(service.is_task_started());
    assert!(read_snapshot(&file).root.contains_text("Hello World"));

    service.stop().unwrap();
    assert_eq!(service.mode(), ScreenshotMode::None);
    assert!(!service.is_task_started());
    f.gui.stop();
}

// =============================================================================
// Contention
// =============================================================================

#[test]
fn test_second_start_is_a_noop() {
    test_utils::init();
    let (f, service) = running_fixture();
    let dir = output_dir("busy");

    service.start_timed(&dir, 30, 1).unwrap();
    assert_eq!(service.start_timed(&dir, 0, 5), Err(ScreenshotError::AlreadyRunning));
    assert_eq!(service.start_apps(&dir), Err(ScreenshotError::AlreadyRunning));
    assert_eq!(service.mode(), ScreenshotMode::Timed);
    assert!(test_utils::has_warning("screenshot_service", "already running"));

    service.stop().unwrap();
    assert!(!capture_file(&dir, "1").exists());
    f.gui.stop();
}

#[test]
fn test_stop_without_task_warns() {
    test_utils::init();
    let (f, service) = running_fixture();

    assert_eq!(service.stop(), Err(ScreenshotError::NotRunning));
    assert_eq!(service.mode(), ScreenshotMode::None);
    assert!(test_utils::has_warning("screenshot_service", "not running"));
    f.gui.stop();
}

#[test]
fn test_finished_task_can_be_replaced() {
    let (f, service) = running_fixture();
    let dir = output_dir("again");

    service.start_timed(&dir, 0, 1).unwrap();
    assert!(wait_until(Duration::from_secs(10), || !service.is_task_started()));

    service.start_apps(&dir).unwrap();
    assert_eq!(service.mode(), ScreenshotMode::Apps);

    service.stop().unwrap();
    f.gui.stop();
}
