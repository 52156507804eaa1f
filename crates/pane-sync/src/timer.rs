//! Software timers
//!
//! Each started timer owns a worker thread that sleeps for the interval and
//! then runs the callback. `stop()` wakes the worker and joins it, so once
//! `stop()` returns the callback is guaranteed not to be running (unless
//! `stop()` was called from inside the callback itself).

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::SyncError;

const TAG: &str = "timer";

/// Whether the timer fires once or repeatedly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerType {
    /// Fire once after the interval, then stop
    Once,
    /// Fire every interval until stopped
    Periodic,
}

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Stop signal shared with the worker thread
#[derive(Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    fn flag(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn raise(&self) {
        *self.flag() = true;
        self.wake.notify_all();
    }

    /// Sleep for `interval` unless stopped first. Returns `true` if stopped.
    fn sleep(&self, interval: Duration) -> bool {
        let stopped = self.flag();
        let (stopped, _) = self
            .wake
            .wait_timeout_while(stopped, interval, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

struct Worker {
    signal: Arc<StopSignal>,
    handle: JoinHandle<()>,
}

/// A one-shot or periodic timer.
pub struct Timer {
    timer_type: TimerType,
    callback: Callback,
    worker: Mutex<Option<Worker>>,
}

impl Timer {
    /// Create a stopped timer.
    pub fn new<F>(timer_type: TimerType, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            timer_type,
            callback: Arc::new(callback),
            worker: Mutex::new(None),
        }
    }

    /// Start (or restart) the timer with the given interval.
    pub fn start(&self, interval: Duration) -> Result<(), SyncError> {
        self.stop();

        let signal = Arc::new(StopSignal::default());
        let callback = Arc::clone(&self.callback);
        let timer_type = self.timer_type;
        let worker_signal = Arc::clone(&signal);

        let handle = thread::Builder::new()
            .name(String::from("timer"))
            .spawn(move || loop {
                if worker_signal.sleep(interval) {
                    break;
                }
                callback();
                if timer_type == TimerType::Once {
                    break;
                }
            })
            .map_err(|e| SyncError::ThreadSpawn(e.to_string()))?;

        *self.worker() = Some(Worker { signal, handle });
        Ok(())
    }

    /// Stop the timer and wait for the worker to exit.
    ///
    /// Calling this from within the callback only signals the worker.
    pub fn stop(&self) {
        let Some(worker) = self.worker().take() else {
            return;
        };

        worker.signal.raise();
        if worker.handle.thread().id() == thread::current().id() {
            return;
        }
        if worker.handle.join().is_err() {
            log::error!(target: TAG, "timer callback panicked");
        }
    }

    /// Whether the timer is armed.
    pub fn is_running(&self) -> bool {
        self.worker()
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }

    /// The timer's type.
    pub fn timer_type(&self) -> TimerType {
        self.timer_type
    }

    fn worker(&self) -> MutexGuard<'_, Option<Worker>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("timer_type", &self.timer_type)
            .field("running", &self.is_running())
            .finish()
    }
}
