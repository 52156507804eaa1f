//! Boot-resolved hardware configuration

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::drivers::{Display, Keyboard, Power, SdCard, Touch};
use crate::error::HalError;

const TAG: &str = "hal";

/// Board boot hook, run once before any driver is used
pub type InitBoot = Box<dyn Fn() -> Result<(), HalError> + Send + Sync>;

/// One optional driver per device category.
///
/// Built by a [`Board`](crate::Board) with the `with_*` methods, then shared
/// read-only for the lifetime of the runtime.
#[derive(Default)]
pub struct Configuration {
    init_boot: Option<InitBoot>,
    display: Option<Arc<dyn Display>>,
    touch: Option<Arc<dyn Touch>>,
    sdcard: Option<Arc<dyn SdCard>>,
    power: Option<Arc<dyn Power>>,
    keyboard: Option<Arc<dyn Keyboard>>,
    /// Outcome of the boot hook, recorded on first run
    booted: OnceLock<Result<(), HalError>>,
}

impl Configuration {
    /// A configuration with no drivers and no boot hook.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init_boot<F>(mut self, init_boot: F) -> Self
    where
        F: Fn() -> Result<(), HalError> + Send + Sync + 'static,
    {
        self.init_boot = Some(Box::new(init_boot));
        self
    }

    pub fn with_display(mut self, display: Arc<dyn Display>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn with_touch(mut self, touch: Arc<dyn Touch>) -> Self {
        self.touch = Some(touch);
        self
    }

    pub fn with_sdcard(mut self, sdcard: Arc<dyn SdCard>) -> Self {
        self.sdcard = Some(sdcard);
        self
    }

    pub fn with_power(mut self, power: Arc<dyn Power>) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_keyboard(mut self, keyboard: Arc<dyn Keyboard>) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn display(&self) -> Option<&Arc<dyn Display>> {
        self.display.as_ref()
    }

    pub fn touch(&self) -> Option<&Arc<dyn Touch>> {
        self.touch.as_ref()
    }

    pub fn sdcard(&self) -> Option<&Arc<dyn SdCard>> {
        self.sdcard.as_ref()
    }

    pub fn power(&self) -> Option<&Arc<dyn Power>> {
        self.power.as_ref()
    }

    pub fn keyboard(&self) -> Option<&Arc<dyn Keyboard>> {
        self.keyboard.as_ref()
    }

    /// Run the board's boot hook.
    ///
    /// The hook runs at most once; later calls return the first outcome.
    pub fn init_hardware(&self) -> Result<(), HalError> {
        self.booted
            .get_or_init(|| {
                let Some(init_boot) = &self.init_boot else {
                    log::debug!(target: TAG, "no boot hook");
                    return Ok(());
                };
                log::info!(target: TAG, "running boot hook");
                let result = init_boot();
                if let Err(e) = &result {
                    log::error!(target: TAG, "boot hook failed: {}", e);
                }
                result
            })
            .clone()
    }

    /// Whether [`init_hardware`](Self::init_hardware) has run.
    pub fn is_initialized(&self) -> bool {
        self.booted.get().is_some()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("init_boot", &self.init_boot.is_some())
            .field("display", &self.display.as_ref().map(|d| d.name().to_string()))
            .field("touch", &self.touch.as_ref().map(|t| t.name().to_string()))
            .field("sdcard", &self.sdcard.is_some())
            .field("power", &self.power.is_some())
            .field("keyboard", &self.keyboard.is_some())
            .finish()
    }
}
