//! SD card monitor
//!
//! Polls the board's card once per second. A card that reports `Error`
//! (typically pulled out while mounted) is unmounted. Every state change is
//! published as an [`SdcardEvent`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pane_hal::{SdCard, SdCardState};
use pane_pubsub::PubSub;
use pane_sync::{TimedMutex, Timer, TimerType};

use crate::context::ServiceContext;
use crate::manifest::ServiceManifest;
use crate::registry::ServiceRegistry;

const TAG: &str = "sdcard_service";

/// Time between two polls of the card
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

const LOCK_TIMEOUT: Duration = Duration::from_millis(50);

pub static MANIFEST: ServiceManifest = ServiceManifest {
    id: "sdcard",
    on_start: Some(on_start),
    on_stop: Some(on_stop),
};

/// Published on [`SdcardService::pubsub`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdcardEvent {
    StateChanged { from: SdCardState, to: SdCardState },
}

struct Shared {
    last_state: TimedMutex<SdCardState>,
    pubsub: PubSub<SdcardEvent>,
    sdcard: Arc<dyn SdCard>,
}

impl Shared {
    fn poll(&self) {
        let Some(mut last_state) = self.last_state.lock(LOCK_TIMEOUT) else {
            log::warn!(target: TAG, "poll: lock timed out");
            return;
        };

        let state = self.sdcard.state();
        if state == SdCardState::Error {
            log::warn!(target: TAG, "Sdcard error - unmounting...");
            if let Err(e) = self.sdcard.unmount() {
                log::error!(target: TAG, "unmount failed: {}", e);
            }
        }

        if state == *last_state {
            return;
        }
        let from = *last_state;
        *last_state = state;
        drop(last_state);

        log::info!(target: TAG, "{:?} -> {:?}", from, state);
        self.pubsub.publish(&SdcardEvent::StateChanged { from, to: state });
    }
}

/// Payload of the running `sdcard` service.
pub struct SdcardService {
    shared: Arc<Shared>,
    timer: Timer,
}

impl SdcardService {
    /// A stopped monitor for `sdcard`; the card counts as unmounted until
    /// the first poll.
    pub fn new(sdcard: Arc<dyn SdCard>) -> Self {
        let shared = Arc::new(Shared {
            last_state: TimedMutex::new(SdCardState::Unmounted),
            pubsub: PubSub::new(),
            sdcard,
        });
        let worker = Arc::clone(&shared);
        let timer = Timer::new(TimerType::Periodic, move || worker.poll());
        Self { shared, timer }
    }

    /// Start polling every `interval`.
    pub fn start(&self, interval: Duration) -> Result<(), pane_sync::SyncError> {
        self.timer.start(interval)
    }

    /// Stop polling; returns once no poll is in progress.
    pub fn stop(&self) {
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Poll the card once, on the calling thread.
    pub fn poll(&self) {
        self.shared.poll();
    }

    /// State seen by the last poll; `None` if the lock timed out.
    pub fn state(&self) -> Option<SdCardState> {
        self.shared.last_state.lock(LOCK_TIMEOUT).map(|state| *state)
    }

    /// State changes
    pub fn pubsub(&self) -> &PubSub<SdcardEvent> {
        &self.shared.pubsub
    }
}

impl fmt::Debug for SdcardService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdcardService")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// The running sdcard service, if any.
pub fn opt_service(registry: &ServiceRegistry) -> Option<Arc<SdcardService>> {
    registry.service_data::<SdcardService>(MANIFEST.id)
}

fn on_start(ctx: &ServiceContext) {
    let Some(sdcard) = ctx.configuration().sdcard() else {
        log::info!(target: TAG, "task not started due to config");
        return;
    };

    let service = Arc::new(SdcardService::new(Arc::clone(sdcard)));
    if let Err(e) = service.start(POLL_INTERVAL) {
        log::error!(target: TAG, "failed to start poll timer: {}", e);
        return;
    }
    ctx.set_data(service);
}

fn on_stop(ctx: &ServiceContext) {
    if let Some(service) = ctx.data::<SdcardService>() {
        service.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pane_hal_mock::MockSdCard;
    use std::sync::Mutex;

    fn monitor(card: &Arc<MockSdCard>) -> (SdcardService, Arc<Mutex<Vec<SdcardEvent>>>) {
        let service = SdcardService::new(Arc::clone(card) as Arc<dyn SdCard>);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        service
            .pubsub()
            .subscribe(move |event: &SdcardEvent| sink.lock().unwrap().push(*event));
        (service, events)
    }

    #[test]
    fn test_first_poll_reports_mounted_card() {
        let card = Arc::new(MockSdCard::mounted());
        let (service, events) = monitor(&card);

        service.poll();
        service.poll();

        assert_eq!(service.state(), Some(SdCardState::Mounted));
        assert_eq!(
            *events.lock().unwrap(),
            vec![SdcardEvent::StateChanged {
                from: SdCardState::Unmounted,
                to: SdCardState::Mounted
            }]
        );
    }

    #[test]
    fn test_error_state_unmounts_card() {
        let card = Arc::new(MockSdCard::mounted());
        let (service, events) = monitor(&card);
        service.poll();

        card.set_state(SdCardState::Error);
        service.poll();
        assert_eq!(card.unmount_calls(), 1);
        assert_eq!(service.state(), Some(SdCardState::Error));

        service.poll();
        assert_eq!(card.unmount_calls(), 1);
        assert_eq!(service.state(), Some(SdCardState::Unmounted));
        assert_eq!(events.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_timer_polls_until_stopped() {
        let card = Arc::new(MockSdCard::mounted());
        let (service, events) = monitor(&card);

        service.start(Duration::from_millis(5)).unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while events.lock().unwrap().is_empty() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        service.stop();

        assert!(!service.is_running());
        assert_eq!(events.lock().unwrap().len(), 1);
    }
}
