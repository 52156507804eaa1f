//! Render-engine lock
//!
//! The widget tree is owned by the [`Renderer`] and can only be reached
//! through a [`RenderGuard`]. Acquisition is always bounded: a caller that
//! cannot get the lock in time must skip its update, never block forever.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use pane_sync::{TimedMutex, TimedMutexGuard};

use crate::error::RenderError;
use crate::snapshot::FrameSnapshot;
use crate::tree::WidgetTree;

const TAG: &str = "render";

/// Timeout used by the draw pass unless configured otherwise
pub const DEFAULT_RENDER_LOCK_TIMEOUT: Duration = Duration::from_millis(1000);

/// Owner of the widget tree.
pub struct Renderer {
    tree: TimedMutex<WidgetTree>,
    width: u32,
    height: u32,
}

impl Renderer {
    /// A renderer for a `width` x `height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            tree: TimedMutex::new(WidgetTree::new()),
            width,
            height,
        }
    }

    /// Acquire the render lock, waiting at most `timeout`.
    pub fn lock(&self, timeout: Duration) -> Result<RenderGuard<'_>, RenderError> {
        match self.tree.lock(timeout) {
            Some(tree) => Ok(RenderGuard {
                tree,
                width: self.width,
                height: self.height,
            }),
            None => {
                log::debug!(target: TAG, "lock timed out after {:?}", timeout);
                Err(RenderError::LockTimeout)
            }
        }
    }

    /// Acquire the render lock only if it is free right now.
    pub fn try_lock(&self) -> Option<RenderGuard<'_>> {
        self.tree.try_lock().map(|tree| RenderGuard {
            tree,
            width: self.width,
            height: self.height,
        })
    }

    /// Whether some thread currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.tree.is_locked()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Exclusive access to the widget tree. Dropping it releases the lock.
pub struct RenderGuard<'a> {
    tree: TimedMutexGuard<'a, WidgetTree>,
    width: u32,
    height: u32,
}

impl RenderGuard<'_> {
    /// Snapshot the tree at the renderer's resolution.
    pub fn snapshot(&self) -> FrameSnapshot {
        self.tree.snapshot(self.width, self.height)
    }
}

impl Deref for RenderGuard<'_> {
    type Target = WidgetTree;

    fn deref(&self) -> &WidgetTree {
        &self.tree
    }
}

impl DerefMut for RenderGuard<'_> {
    fn deref_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_and_mutate() {
        let renderer = Renderer::new(320, 240);
        {
            let mut tree = renderer.lock(Duration::from_millis(10)).unwrap();
            let root = tree.root();
            tree.create(root, NodeKind::Label).unwrap();
            assert!(renderer.is_locked());
        }
        assert!(!renderer.is_locked());

        let tree = renderer.lock(Duration::from_millis(10)).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.snapshot().width, 320);
    }

    #[test]
    fn test_lock_times_out_while_held() {
        let renderer = Arc::new(Renderer::new(320, 240));
        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let holder = {
            let renderer = Arc::clone(&renderer);
            thread::spawn(move || {
                let _guard = renderer.lock(Duration::from_secs(1)).unwrap();
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        };

        locked_rx.recv().unwrap();
        assert_eq!(
            renderer.lock(Duration::from_millis(20)).err(),
            Some(RenderError::LockTimeout)
        );
        release_tx.send(()).unwrap();
        holder.join().unwrap();

        assert!(renderer.lock(Duration::from_millis(20)).is_ok());
    }
}
