//! Rendering-engine boundary for Pane
//!
//! The widget tree is the state of the rendering engine: a hierarchy of
//! nodes (containers, labels, buttons, ...) hanging off a single root. The
//! engine is not thread-safe, so the tree lives inside a [`Renderer`] and is
//! only reachable through a [`RenderGuard`] obtained from
//! [`Renderer::lock`] with a bounded timeout.
//!
//! Layout and pixel drawing are out of scope; a [`FrameSnapshot`] of the
//! tree is what gets persisted when capturing the screen.

#![forbid(unsafe_code)]

mod error;
mod renderer;
mod snapshot;
mod tree;

pub use error::RenderError;
pub use renderer::{RenderGuard, Renderer, DEFAULT_RENDER_LOCK_TIMEOUT};
pub use snapshot::{FrameSnapshot, SnapshotNode};
pub use tree::{Node, NodeId, NodeKind, WidgetTree};
