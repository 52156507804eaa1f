//! The gui: orchestration lock, current view port and frame clock

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use pane_apps::AppContext;
use pane_hal::Configuration;
use pane_pubsub::PubSub;
use pane_render::{FrameSnapshot, NodeId, NodeKind, Renderer, WidgetTree};
use pane_sync::{EventFlags, MessageQueue, RecursiveMutex, RecursiveMutexGuard};

use crate::config::{GuiConfig, KeyboardMode};
use crate::error::GuiError;
use crate::input::InputEvent;
use crate::view_port::ViewPort;

pub(crate) const TAG: &str = "gui";

// =============================================================================
// Gui thread flags
// =============================================================================

pub(crate) const FLAG_DRAW: u32 = 1 << 0;
pub(crate) const FLAG_INPUT: u32 = 1 << 1;
pub(crate) const FLAG_EXIT: u32 = 1 << 2;
pub(crate) const FLAG_ALL: u32 = FLAG_DRAW | FLAG_INPUT | FLAG_EXIT;

/// State guarded by the orchestration lock
#[derive(Default)]
pub(crate) struct GuiState {
    /// `None` is valid: there is nothing to draw
    pub(crate) view_port: Option<ViewPort>,
}

/// Counts completed draw passes so other threads can wait for a new frame.
#[derive(Default)]
struct FrameClock {
    count: Mutex<u64>,
    advanced: Condvar,
}

/// Held orchestration lock. Reentrant; dropping it unlocks one level.
#[must_use = "if unused the gui lock will immediately unlock"]
pub struct GuiLock<'a> {
    _guard: RecursiveMutexGuard<'a, RefCell<GuiState>>,
}

/// Shared rendering surface multiplexed between apps.
pub struct Gui {
    pub(crate) state: RecursiveMutex<RefCell<GuiState>>,
    pub(crate) renderer: Arc<Renderer>,
    pub(crate) hardware: Arc<Configuration>,
    pub(crate) config: GuiConfig,
    /// Parent of the app's container; cleaned on every redraw
    pub(crate) app_root: NodeId,
    pub(crate) statusbar: NodeId,
    /// Lives under `app_root`; gone after every clean
    keyboard: Mutex<Option<NodeId>>,
    pub(crate) flags: EventFlags,
    input: MessageQueue<InputEvent>,
    input_pubsub: PubSub<InputEvent>,
    frames: FrameClock,
    pub(crate) thread: Mutex<Option<JoinHandle<()>>>,
}

impl Gui {
    /// Create the gui and its fixed widgets (status bar, app root).
    pub fn new(
        renderer: Arc<Renderer>,
        hardware: Arc<Configuration>,
        config: GuiConfig,
    ) -> Result<Self, GuiError> {
        let (statusbar, app_root) = {
            let mut tree = renderer.lock(config.render_lock_timeout())?;
            let root = tree.root();
            let statusbar = tree.create(root, NodeKind::Statusbar)?;
            let app_root = tree.create(root, NodeKind::Container)?;
            tree.set_flex_grow(app_root, 1)?;
            (statusbar, app_root)
        };

        Ok(Self {
            state: RecursiveMutex::new(RefCell::new(GuiState::default())),
            input: MessageQueue::new(config.input_queue_capacity),
            renderer,
            hardware,
            config,
            app_root,
            statusbar,
            keyboard: Mutex::new(None),
            flags: EventFlags::new(),
            input_pubsub: PubSub::new(),
            frames: FrameClock::default(),
            thread: Mutex::new(None),
        })
    }

    // =========================================================================
    // Orchestration
    // =========================================================================

    /// Take the orchestration lock, waiting as long as needed.
    ///
    /// Reentrant: lifecycle callbacks running under the lock may call back
    /// into the gui or the loader.
    pub fn lock(&self) -> GuiLock<'_> {
        GuiLock {
            _guard: self.state.lock(),
        }
    }

    /// Schedule a redraw on the gui thread. Requests coalesce.
    pub fn request_draw(&self) {
        self.flags.set(FLAG_DRAW);
    }

    /// Make `app` the foreground app and schedule a redraw.
    ///
    /// An app still showing is hidden first.
    pub fn show_app(&self, app: Arc<AppContext>) {
        let state = self.state.lock();
        self.hide_app();
        log::debug!(target: TAG, "show {}", app.id());
        state.borrow_mut().view_port = Some(ViewPort::new(app));
        drop(state);
        self.request_draw();
    }

    /// Hide the foreground app: run its `on_hide` and forget the view port.
    pub fn hide_app(&self) {
        let state = self.state.lock();
        let Some(view_port) = state.borrow().view_port.clone() else {
            return;
        };

        log::debug!(target: TAG, "hide {}", view_port.app().id());
        view_port.hide();

        // on_hide may have replaced the view port already
        let mut current = state.borrow_mut();
        if current
            .view_port
            .as_ref()
            .is_some_and(|vp| Arc::ptr_eq(vp.app(), view_port.app()))
        {
            current.view_port = None;
        }
        drop(current);

        // Still under the orchestration lock: render lock is the inner one
        self.remove_keyboard();
        drop(state);
        self.request_draw();
    }

    /// The app that owns the screen, if any.
    pub fn current_app(&self) -> Option<Arc<AppContext>> {
        let state = self.state.lock();
        let current = state.borrow().view_port.as_ref().map(|vp| Arc::clone(vp.app()));
        current
    }

    // =========================================================================
    // On-screen keyboard
    // =========================================================================

    /// Whether redraws create an on-screen keyboard.
    pub fn keyboard_is_enabled(&self) -> bool {
        match self.config.keyboard {
            KeyboardMode::Enabled => true,
            KeyboardMode::Disabled => false,
            KeyboardMode::Auto => {
                let has_touch = self.hardware.touch().is_some();
                let hardware_keyboard = self
                    .hardware
                    .keyboard()
                    .is_some_and(|keyboard| keyboard.is_attached());
                has_touch && !hardware_keyboard
            }
        }
    }

    /// Show the keyboard, typing into `target`.
    ///
    /// Takes the tree to prove the render lock is held. Returns `false` when
    /// the current view has no keyboard.
    pub fn keyboard_show(&self, tree: &mut WidgetTree, target: NodeId) -> Result<bool, GuiError> {
        let Some(keyboard) = *self.keyboard() else {
            return Ok(false);
        };
        tree.set_target(keyboard, Some(target))?;
        tree.set_hidden(keyboard, false)?;
        Ok(true)
    }

    /// Hide the keyboard and detach it from its target.
    pub fn keyboard_hide(&self, tree: &mut WidgetTree) -> Result<(), GuiError> {
        let Some(keyboard) = *self.keyboard() else {
            return Ok(());
        };
        tree.set_hidden(keyboard, true)?;
        tree.set_target(keyboard, None)?;
        Ok(())
    }

    pub(crate) fn set_keyboard(&self, keyboard: Option<NodeId>) {
        *self.keyboard() = keyboard;
    }

    fn remove_keyboard(&self) {
        let Some(keyboard) = self.keyboard().take() else {
            return;
        };
        // Otherwise the next redraw's clean removes it
        if let Some(mut tree) = self.renderer.try_lock() {
            if tree.delete(keyboard).is_err() {
                log::debug!(target: TAG, "keyboard already gone");
            }
        }
    }

    fn keyboard(&self) -> MutexGuard<'_, Option<NodeId>> {
        self.keyboard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Frame clock
    // =========================================================================

    /// Number of completed draw passes
    pub fn frame_count(&self) -> u64 {
        *self.frames()
    }

    /// Wait until a draw pass newer than `after` completes.
    ///
    /// Returns the new frame count, or `None` on timeout.
    pub fn wait_for_frame(&self, after: u64, timeout: Duration) -> Option<u64> {
        // An overflowing deadline waits forever
        let deadline = Instant::now().checked_add(timeout);
        let mut count = self.frames();
        while *count <= after {
            count = match deadline {
                None => self
                    .frames
                    .advanced
                    .wait(count)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let remaining = deadline.checked_duration_since(Instant::now())?;
                    self.frames
                        .advanced
                        .wait_timeout(count, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
        Some(*count)
    }

    pub(crate) fn advance_frame(&self) {
        *self.frames() += 1;
        self.frames.advanced.notify_all();
    }

    fn frames(&self) -> MutexGuard<'_, u64> {
        self.frames.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Queue an input event for the gui thread.
    pub fn post_input(&self, event: InputEvent) -> Result<(), GuiError> {
        if let Err(event) = self.input.put(event, Duration::ZERO) {
            log::warn!(target: TAG, "input queue full, dropping {:?}", event);
            return Err(GuiError::InputQueueFull);
        }
        self.flags.set(FLAG_INPUT);
        Ok(())
    }

    /// Publish every queued input event. Returns how many were delivered.
    pub fn dispatch_input(&self) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.input.try_get() {
            self.input_pubsub.publish(&event);
            delivered += 1;
        }
        delivered
    }

    /// Topic carrying input events, published from the gui thread
    pub fn input_pubsub(&self) -> &PubSub<InputEvent> {
        &self.input_pubsub
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Capture the widget tree.
    pub fn snapshot(&self, timeout: Duration) -> Result<FrameSnapshot, GuiError> {
        let tree = self.renderer.lock(timeout)?;
        Ok(tree.snapshot())
    }

    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }

    pub fn hardware(&self) -> &Arc<Configuration> {
        &self.hardware
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Node the app containers are created under
    pub fn app_root(&self) -> NodeId {
        self.app_root
    }

    pub fn statusbar(&self) -> NodeId {
        self.statusbar
    }
}

impl fmt::Debug for Gui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gui")
            .field("frames", &self.frame_count())
            .field("keyboard_enabled", &self.keyboard_is_enabled())
            .finish_non_exhaustive()
    }
}
