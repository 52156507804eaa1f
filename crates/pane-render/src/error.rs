//! Render error types

use core::fmt;

use crate::tree::NodeId;

/// Errors reported by the widget tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The node does not exist (never created or already deleted)
    UnknownNode(NodeId),
    /// The root node cannot be deleted
    RootNotDeletable,
    /// The render lock could not be acquired in time
    LockTimeout,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownNode(id) => write!(f, "Unknown node: {}", id),
            RenderError::RootNotDeletable => write!(f, "Root node cannot be deleted"),
            RenderError::LockTimeout => write!(f, "Render lock timed out"),
        }
    }
}

impl std::error::Error for RenderError {}
