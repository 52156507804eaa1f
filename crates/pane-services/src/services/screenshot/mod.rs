//! Screenshot Service
//!
//! Captures frames of the widget tree into JSON files. Two modes:
//!
//! - **Timed**: `count` captures, `delay_seconds` apart, written to
//!   `<path>/screenshot-<n>.json`
//! - **Apps**: one capture per app the first time it is shown, written to
//!   `<path>/screenshot-<app_id>.json`
//!
//! Capturing runs on a task thread; at most one task exists at a time.
//! Every public call takes the service lock with a short timeout and gives
//! up with a warning if it cannot.

mod task;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pane_sync::{TimedMutex, TimedMutexGuard};

use crate::context::ServiceContext;
use crate::error::ScreenshotError;
use crate::manifest::ServiceManifest;
use crate::registry::ServiceRegistry;
use crate::runtime::Runtime;

use task::{Job, ScreenshotTask};

const TAG: &str = "screenshot_service";

const LOCK_TIMEOUT: Duration = Duration::from_millis(50);

pub static MANIFEST: ServiceManifest = ServiceManifest {
    id: "Screenshot",
    on_start: Some(on_start),
    on_stop: Some(on_stop),
};

/// What the service is capturing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScreenshotMode {
    #[default]
    None,
    Apps,
    Timed,
}

struct Inner {
    task: Option<ScreenshotTask>,
    mode: ScreenshotMode,
}

/// Payload of the running `Screenshot` service.
pub struct ScreenshotService {
    inner: TimedMutex<Inner>,
    runtime: Runtime,
}

impl ScreenshotService {
    pub fn new(runtime: Runtime) -> Self {
        Self {
            inner: TimedMutex::new(Inner {
                task: None,
                mode: ScreenshotMode::None,
            }),
            runtime,
        }
    }

    /// Capture every app once, the first time it is shown.
    pub fn start_apps(&self, path: impl AsRef<Path>) -> Result<(), ScreenshotError> {
        self.start(
            ScreenshotMode::Apps,
            Job::Apps {
                path: path.as_ref().to_path_buf(),
            },
        )
    }

    /// Capture `count` frames, waiting `delay_seconds` before each one.
    pub fn start_timed(
        &self,
        path: impl AsRef<Path>,
        delay_seconds: u8,
        count: u8,
    ) -> Result<(), ScreenshotError> {
        self.start(
            ScreenshotMode::Timed,
            Job::Timed {
                path: path.as_ref().to_path_buf(),
                delay: Duration::from_secs(u64::from(delay_seconds)),
                count,
            },
        )
    }

    /// Stop the capture task, finished or not.
    pub fn stop(&self) -> Result<(), ScreenshotError> {
        let mut inner = self.inner("stop")?;
        let Some(task) = inner.task.take() else {
            log::warn!(target: TAG, "stop: task not running");
            return Err(ScreenshotError::NotRunning);
        };
        inner.mode = ScreenshotMode::None;
        drop(inner);

        drop(task);
        log::info!(target: TAG, "stopped");
        Ok(())
    }

    /// Current mode; `None` when the lock cannot be taken.
    pub fn mode(&self) -> ScreenshotMode {
        self.inner("mode")
            .map(|inner| inner.mode)
            .unwrap_or(ScreenshotMode::None)
    }

    /// Whether a capture task exists and has not finished.
    pub fn is_task_started(&self) -> bool {
        self.inner("is_task_started")
            .map(|inner| inner.task.as_ref().is_some_and(|task| !task.is_finished()))
            .unwrap_or(false)
    }

    fn start(&self, mode: ScreenshotMode, job: Job) -> Result<(), ScreenshotError> {
        let mut inner = self.inner("start")?;
        if inner.task.as_ref().is_some_and(|task| !task.is_finished()) {
            log::warn!(target: TAG, "start {:?}: task already running", mode);
            return Err(ScreenshotError::AlreadyRunning);
        }

        log::info!(target: TAG, "start {:?} capture to {}", mode, job.path().display());
        // A finished task is replaced; dropping it joins its exited thread
        inner.task = Some(ScreenshotTask::spawn(job, self.runtime.clone())?);
        inner.mode = mode;
        Ok(())
    }

    fn inner(&self, operation: &str) -> Result<TimedMutexGuard<'_, Inner>, ScreenshotError> {
        self.inner.lock(LOCK_TIMEOUT).ok_or_else(|| {
            log::warn!(target: TAG, "{}: lock timed out", operation);
            ScreenshotError::LockTimeout
        })
    }

    /// Stop without complaining about a missing task.
    fn shutdown(&self) {
        let task = self.inner.lock_forever().task.take();
        drop(task);
    }
}

impl fmt::Debug for ScreenshotService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenshotService")
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}

/// The running screenshot service, if any.
pub fn opt_service(registry: &ServiceRegistry) -> Option<Arc<ScreenshotService>> {
    registry.service_data::<ScreenshotService>(MANIFEST.id)
}

/// Where `<n>` or `<app_id>` captures land under `path`.
pub fn capture_file(path: &Path, name: &str) -> PathBuf {
    path.join(format!("screenshot-{}.json", name))
}

fn on_start(ctx: &ServiceContext) {
    ctx.set_data(Arc::new(ScreenshotService::new(ctx.runtime().clone())));
}

fn on_stop(ctx: &ServiceContext) {
    if let Some(service) = ctx.data::<ScreenshotService>() {
        service.shutdown();
    }
}
