//! Mock board for testing Pane
//!
//! Provides a simulated device whose peripherals can be driven from tests:
//! the sdcard state can be forced (including `Error` to simulate unsafe
//! ejection), touches can be injected and the battery level set.
//!
//! Every driver is shared through an `Arc`, so a test keeps its own handle
//! to the same instance the runtime sees.

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pane_hal::{
    Board, Configuration, Display, HalError, Keyboard, Power, SdCard, SdCardState, Touch,
    TouchPoint,
};

const TAG: &str = "hal_mock";

/// Board name used by [`MockBoard::new`]
pub const MOCK_BOARD_NAME: &str = "mock";

// =============================================================================
// Display
// =============================================================================

/// Fixed-size simulated panel
#[derive(Debug)]
pub struct MockDisplay {
    width: u32,
    height: u32,
    backlight: AtomicU8,
}

impl MockDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            backlight: AtomicU8::new(255),
        }
    }

    /// Last backlight level set
    pub fn backlight(&self) -> u8 {
        self.backlight.load(Ordering::SeqCst)
    }
}

impl Display for MockDisplay {
    fn name(&self) -> &str {
        "mock-display"
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_backlight(&self, level: u8) -> Result<(), HalError> {
        self.backlight.store(level, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Touch
// =============================================================================

/// Touch panel returning whatever point was last injected
#[derive(Debug, Default)]
pub struct MockTouch {
    point: Mutex<Option<TouchPoint>>,
}

impl MockTouch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a finger at `(x, y)`
    pub fn press(&self, x: u16, y: u16) {
        *self.point() = Some(TouchPoint { x, y });
    }

    /// Simulate lifting the finger
    pub fn release(&self) {
        *self.point() = None;
    }

    fn point(&self) -> MutexGuard<'_, Option<TouchPoint>> {
        self.point.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Touch for MockTouch {
    fn name(&self) -> &str {
        "mock-touch"
    }

    fn read(&self) -> Option<TouchPoint> {
        *self.point()
    }
}

// =============================================================================
// SD card
// =============================================================================

#[derive(Debug)]
struct CardState {
    state: SdCardState,
    mount_path: Option<String>,
}

/// SD card whose state tests can force
#[derive(Debug)]
pub struct MockSdCard {
    card: Mutex<CardState>,
    unmount_calls: AtomicUsize,
}

impl MockSdCard {
    /// A card mounted at `/sdcard`
    pub fn mounted() -> Self {
        Self {
            card: Mutex::new(CardState {
                state: SdCardState::Mounted,
                mount_path: Some(String::from("/sdcard")),
            }),
            unmount_calls: AtomicUsize::new(0),
        }
    }

    /// A card present but not mounted
    pub fn unmounted() -> Self {
        Self {
            card: Mutex::new(CardState {
                state: SdCardState::Unmounted,
                mount_path: None,
            }),
            unmount_calls: AtomicUsize::new(0),
        }
    }

    /// Force the reported state, e.g. `Error` to simulate unsafe ejection.
    pub fn set_state(&self, state: SdCardState) {
        self.card().state = state;
    }

    /// How many times `unmount` was called
    pub fn unmount_calls(&self) -> usize {
        self.unmount_calls.load(Ordering::SeqCst)
    }

    fn card(&self) -> MutexGuard<'_, CardState> {
        self.card.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SdCard for MockSdCard {
    fn state(&self) -> SdCardState {
        self.card().state
    }

    fn mount(&self, path: &str) -> Result<(), HalError> {
        let mut card = self.card();
        if card.state == SdCardState::Mounted {
            return Err(HalError::AlreadyMounted);
        }
        log::debug!(target: TAG, "mount {}", path);
        card.state = SdCardState::Mounted;
        card.mount_path = Some(path.to_string());
        Ok(())
    }

    fn unmount(&self) -> Result<(), HalError> {
        self.unmount_calls.fetch_add(1, Ordering::SeqCst);
        let mut card = self.card();
        match card.state {
            SdCardState::Mounted | SdCardState::Error => {
                card.state = SdCardState::Unmounted;
                card.mount_path = None;
                Ok(())
            }
            _ => Err(HalError::NotMounted),
        }
    }

    fn mount_path(&self) -> Option<String> {
        self.card().mount_path.clone()
    }
}

// =============================================================================
// Power & keyboard
// =============================================================================

/// Battery with a settable charge level
#[derive(Debug)]
pub struct MockPower {
    level: AtomicU8,
    charging: AtomicBool,
}

impl MockPower {
    pub fn new(level: u8) -> Self {
        Self {
            level: AtomicU8::new(level.min(100)),
            charging: AtomicBool::new(false),
        }
    }

    pub fn set_level(&self, level: u8) {
        self.level.store(level.min(100), Ordering::SeqCst);
    }

    pub fn set_charging(&self, charging: bool) {
        self.charging.store(charging, Ordering::SeqCst);
    }
}

impl Power for MockPower {
    fn charge_level(&self) -> u8 {
        self.level.load(Ordering::SeqCst)
    }

    fn is_charging(&self) -> bool {
        self.charging.load(Ordering::SeqCst)
    }
}

/// Hardware keyboard that can be plugged and unplugged
#[derive(Debug)]
pub struct MockKeyboard {
    attached: AtomicBool,
}

impl MockKeyboard {
    pub fn new(attached: bool) -> Self {
        Self {
            attached: AtomicBool::new(attached),
        }
    }

    pub fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::SeqCst);
    }
}

impl Keyboard for MockKeyboard {
    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Board
// =============================================================================

/// Simulated device.
///
/// [`MockBoard::new`] has a 320x240 display, touch, a mounted sdcard and a
/// battery, but no hardware keyboard. The `without_*` / `with_keyboard`
/// methods adjust the peripheral set.
#[derive(Debug)]
pub struct MockBoard {
    name: String,
    display: Option<Arc<MockDisplay>>,
    touch: Option<Arc<MockTouch>>,
    sdcard: Option<Arc<MockSdCard>>,
    power: Option<Arc<MockPower>>,
    keyboard: Option<Arc<MockKeyboard>>,
    boot_count: Arc<AtomicUsize>,
    fail_boot: bool,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::named(MOCK_BOARD_NAME)
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display: Some(Arc::new(MockDisplay::new(320, 240))),
            touch: Some(Arc::new(MockTouch::new())),
            sdcard: Some(Arc::new(MockSdCard::mounted())),
            power: Some(Arc::new(MockPower::new(100))),
            keyboard: None,
            boot_count: Arc::new(AtomicUsize::new(0)),
            fail_boot: false,
        }
    }

    /// A board with no peripherals at all
    pub fn headless(name: &str) -> Self {
        Self {
            display: None,
            touch: None,
            sdcard: None,
            power: None,
            ..Self::named(name)
        }
    }

    pub fn without_touch(mut self) -> Self {
        self.touch = None;
        self
    }

    pub fn without_sdcard(mut self) -> Self {
        self.sdcard = None;
        self
    }

    pub fn with_keyboard(mut self, attached: bool) -> Self {
        self.keyboard = Some(Arc::new(MockKeyboard::new(attached)));
        self
    }

    /// Make the boot hook fail
    pub fn with_failing_boot(mut self) -> Self {
        self.fail_boot = true;
        self
    }

    pub fn display(&self) -> Option<Arc<MockDisplay>> {
        self.display.clone()
    }

    pub fn touch(&self) -> Option<Arc<MockTouch>> {
        self.touch.clone()
    }

    pub fn sdcard(&self) -> Option<Arc<MockSdCard>> {
        self.sdcard.clone()
    }

    pub fn power(&self) -> Option<Arc<MockPower>> {
        self.power.clone()
    }

    pub fn keyboard(&self) -> Option<Arc<MockKeyboard>> {
        self.keyboard.clone()
    }

    /// Number of times the boot hook ran, across all configurations
    pub fn boot_count(&self) -> usize {
        self.boot_count.load(Ordering::SeqCst)
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for MockBoard {
    fn name(&self) -> &str {
        &self.name
    }

    fn configuration(&self) -> Configuration {
        let boot_count = Arc::clone(&self.boot_count);
        let fail_boot = self.fail_boot;
        let mut config = Configuration::new().with_init_boot(move || {
            boot_count.fetch_add(1, Ordering::SeqCst);
            if fail_boot {
                Err(HalError::BootFailed(String::from("mock boot failure")))
            } else {
                Ok(())
            }
        });

        if let Some(display) = &self.display {
            config = config.with_display(Arc::clone(display) as Arc<dyn Display>);
        }
        if let Some(touch) = &self.touch {
            config = config.with_touch(Arc::clone(touch) as Arc<dyn Touch>);
        }
        if let Some(sdcard) = &self.sdcard {
            config = config.with_sdcard(Arc::clone(sdcard) as Arc<dyn SdCard>);
        }
        if let Some(power) = &self.power {
            config = config.with_power(Arc::clone(power) as Arc<dyn Power>);
        }
        if let Some(keyboard) = &self.keyboard {
            config = config.with_keyboard(Arc::clone(keyboard) as Arc<dyn Keyboard>);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_peripherals() {
        let board = MockBoard::new();
        let config = board.configuration();

        assert_eq!(board.name(), MOCK_BOARD_NAME);
        assert_eq!(config.display().unwrap().width(), 320);
        assert!(config.touch().is_some());
        assert!(config.sdcard().is_some());
        assert_eq!(config.power().unwrap().charge_level(), 100);
        assert!(config.keyboard().is_none());
    }

    #[test]
    fn test_headless_board() {
        let config = MockBoard::headless("bare").configuration();
        assert!(config.display().is_none());
        assert!(config.touch().is_none());
        assert!(config.sdcard().is_none());
        assert!(config.power().is_none());
    }

    #[test]
    fn test_shared_driver_handles() {
        let board = MockBoard::new();
        let config = board.configuration();

        board.sdcard().unwrap().set_state(SdCardState::Error);
        assert_eq!(config.sdcard().unwrap().state(), SdCardState::Error);

        board.touch().unwrap().press(10, 20);
        assert_eq!(config.touch().unwrap().read(), Some(TouchPoint { x: 10, y: 20 }));
        board.touch().unwrap().release();
        assert_eq!(config.touch().unwrap().read(), None);

        config.display().unwrap().set_backlight(40).unwrap();
        assert_eq!(board.display().unwrap().backlight(), 40);
    }

    #[test]
    fn test_sdcard_mount_cycle() {
        let card = MockSdCard::unmounted();
        assert_eq!(card.unmount(), Err(HalError::NotMounted));

        card.mount("/sdcard").unwrap();
        assert_eq!(card.mount("/sdcard"), Err(HalError::AlreadyMounted));
        assert_eq!(card.mount_path().as_deref(), Some("/sdcard"));

        card.set_state(SdCardState::Error);
        card.unmount().unwrap();
        assert_eq!(card.state(), SdCardState::Unmounted);
        assert_eq!(card.mount_path(), None);
        assert_eq!(card.unmount_calls(), 2);
    }

    #[test]
    fn test_boot_hook_counts() {
        let board = MockBoard::new();
        let config = board.configuration();
        config.init_hardware().unwrap();
        config.init_hardware().unwrap();
        assert_eq!(board.boot_count(), 1);
    }

    #[test]
    fn test_failing_boot() {
        let board = MockBoard::new().with_failing_boot();
        assert!(matches!(
            board.configuration().init_hardware(),
            Err(HalError::BootFailed(_))
        ));
    }

    #[test]
    fn test_power_level_is_clamped() {
        let power = MockPower::new(150);
        assert_eq!(power.charge_level(), 100);
        power.set_level(42);
        power.set_charging(true);
        assert_eq!(power.charge_level(), 42);
        assert!(power.is_charging());
    }
}
