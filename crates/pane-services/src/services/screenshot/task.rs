//! Capture task thread

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use pane_pubsub::SubscriptionId;
use pane_sync::MessageQueue;

use crate::error::ScreenshotError;
use crate::loader::LoaderEvent;
use crate::runtime::Runtime;

use super::{capture_file, TAG};

/// Granularity at which the task notices a stop request
const POLL: Duration = Duration::from_millis(50);

/// How long a capture waits for the requested redraw
const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

const SHOWN_QUEUE_CAPACITY: usize = 16;

pub(super) enum Job {
    Apps { path: PathBuf },
    Timed { path: PathBuf, delay: Duration, count: u8 },
}

impl Job {
    pub(super) fn path(&self) -> &Path {
        match self {
            Job::Apps { path } | Job::Timed { path, .. } => path,
        }
    }
}

/// A job with its resources acquired
enum Work {
    Apps { path: PathBuf, shown: ShownApps },
    Timed { path: PathBuf, delay: Duration, count: u8 },
}

/// A running capture thread. Dropping it stops and joins the thread.
pub(super) struct ScreenshotTask {
    interrupted: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ScreenshotTask {
    pub(super) fn spawn(job: Job, runtime: Runtime) -> Result<Self, ScreenshotError> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));

        // Subscribe before returning so no app shown after start is missed
        let work = match job {
            Job::Timed { path, delay, count } => Work::Timed { path, delay, count },
            Job::Apps { path } => Work::Apps {
                shown: ShownApps::subscribe(&runtime),
                path,
            },
        };

        let worker = Worker {
            runtime,
            interrupted: Arc::clone(&interrupted),
        };
        let done = Arc::clone(&finished);
        let handle = thread::Builder::new()
            .name(String::from("screenshot"))
            .spawn(move || {
                match work {
                    Work::Timed { path, delay, count } => worker.run_timed(&path, delay, count),
                    Work::Apps { path, shown } => worker.run_apps(&path, shown),
                }
                done.store(true, Ordering::Release);
            })
            .map_err(|e| ScreenshotError::TaskSpawn(e.to_string()))?;

        Ok(Self {
            interrupted,
            finished,
            handle: Some(handle),
        })
    }

    pub(super) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

impl Drop for ScreenshotTask {
    fn drop(&mut self) {
        self.interrupted.store(true, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            log::error!(target: TAG, "capture task panicked");
        }
    }
}

/// Ids of apps being shown, fed by a loader subscription that lives as
/// long as this value.
struct ShownApps {
    queue: Arc<MessageQueue<&'static str>>,
    subscription: SubscriptionId,
    runtime: Runtime,
}

impl ShownApps {
    fn subscribe(runtime: &Runtime) -> Self {
        let queue = Arc::new(MessageQueue::new(SHOWN_QUEUE_CAPACITY));
        let sink = Arc::clone(&queue);
        let subscription = runtime.loader().pubsub().subscribe(move |event: &LoaderEvent| {
            if let LoaderEvent::AppShowing { id } = event {
                if sink.put(*id, Duration::ZERO).is_err() {
                    log::warn!(target: TAG, "capture queue full, skipping {}", id);
                }
            }
        });
        Self {
            queue,
            subscription,
            runtime: runtime.clone(),
        }
    }
}

impl Drop for ShownApps {
    fn drop(&mut self) {
        if let Err(e) = self.runtime.loader().pubsub().unsubscribe(self.subscription) {
            log::error!(target: TAG, "unsubscribe: {}", e);
        }
    }
}

struct Worker {
    runtime: Runtime,
    interrupted: Arc<AtomicBool>,
}

impl Worker {
    fn run_timed(&self, path: &Path, delay: Duration, count: u8) {
        for n in 1..=count {
            if !self.sleep(delay) {
                return;
            }
            self.capture(&capture_file(path, &n.to_string()));
        }
        log::info!(target: TAG, "timed capture done ({} frames)", count);
    }

    fn run_apps(&self, path: &Path, shown: ShownApps) {
        let mut captured: HashSet<&'static str> = HashSet::new();
        while !self.is_interrupted() {
            let Some(id) = shown.queue.get(POLL) else {
                continue;
            };
            if captured.insert(id) {
                self.capture(&capture_file(path, id));
            }
        }
    }

    /// Redraw, wait for the frame, snapshot it to `file`.
    fn capture(&self, file: &Path) {
        let gui = self.runtime.gui();
        let frame = gui.frame_count();
        gui.request_draw();
        if gui.wait_for_frame(frame, FRAME_TIMEOUT).is_none() {
            log::warn!(target: TAG, "no frame drawn within {:?}", FRAME_TIMEOUT);
        }

        let snapshot = match gui.snapshot(gui.config().render_lock_timeout()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!(target: TAG, "snapshot failed: {}", e);
                return;
            }
        };
        let json = match serde_json::to_vec_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                log::error!(target: TAG, "encode failed: {}", e);
                return;
            }
        };

        if let Some(dir) = file.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                log::error!(target: TAG, "create {}: {}", dir.display(), e);
                return;
            }
        }
        match fs::write(file, json) {
            Ok(()) => log::info!(target: TAG, "saved {}", file.display()),
            Err(e) => log::error!(target: TAG, "write {}: {}", file.display(), e),
        }
    }

    /// Wait `duration`; `false` if interrupted first.
    fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_interrupted() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(POLL.min(deadline - now));
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }
}
