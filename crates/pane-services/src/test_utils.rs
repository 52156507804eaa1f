//! Log capture for tests
//!
//! Installs a process-wide [`log::Log`] that records every entry together
//! with the thread that emitted it. Tests read back only their own thread's
//! entries, so tests running in parallel do not see each other's output.
//!
//! ```ignore
//! test_utils::init();
//! registry.stop_service("Screenshot").unwrap_err();
//! assert!(test_utils::has_warning("service_registry", "not running"));
//! ```

use std::sync::{Mutex, MutexGuard, Once, PoisonError};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// One captured log line
#[derive(Clone, Debug)]
pub struct CapturedLog {
    pub thread: ThreadId,
    pub level: Level,
    pub target: String,
    pub message: String,
}

struct CaptureLogger {
    entries: Mutex<Vec<CapturedLog>>,
}

impl CaptureLogger {
    fn entries(&self) -> MutexGuard<'_, Vec<CapturedLog>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.entries().push(CapturedLog {
            thread: thread::current().id(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    entries: Mutex::new(Vec::new()),
};

static INIT: Once = Once::new();

/// Install the capturing logger. Safe to call from every test.
pub fn init() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Entries logged so far by the current thread
pub fn captured() -> Vec<CapturedLog> {
    let me = thread::current().id();
    LOGGER
        .entries()
        .iter()
        .filter(|entry| entry.thread == me)
        .cloned()
        .collect()
}

/// Whether the current thread logged a warning for `target` containing `fragment`.
pub fn has_warning(target: &str, fragment: &str) -> bool {
    captured()
        .iter()
        .any(|entry| entry.level == Level::Warn && entry.target == target && entry.message.contains(fragment))
}

/// Drop the current thread's entries.
pub fn clear() {
    let me = thread::current().id();
    LOGGER.entries().retain(|entry| entry.thread != me);
}
