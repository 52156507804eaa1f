//! Serializable frame snapshots

use serde::{Deserialize, Serialize};

use crate::tree::NodeKind;

/// One node of a [`FrameSnapshot`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub flex_grow: u8,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    /// Depth-first search for a node carrying `text`
    pub fn contains_text(&self, text: &str) -> bool {
        self.text.as_deref() == Some(text) || self.children.iter().any(|c| c.contains_text(text))
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SnapshotNode::count).sum::<usize>()
    }
}

/// Captured state of the screen
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Format version
    pub version: u32,
    /// Display width in pixels
    pub width: u32,
    /// Display height in pixels
    pub height: u32,
    pub root: SnapshotNode,
}

impl FrameSnapshot {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(width: u32, height: u32, root: SnapshotNode) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            width,
            height,
            root,
        }
    }
}
