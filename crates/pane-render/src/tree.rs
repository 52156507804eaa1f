//! Widget tree: node storage, parent/child structure and properties

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::snapshot::{FrameSnapshot, SnapshotNode};

/// Node handle. Stays valid until the node (or an ancestor) is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Widget types known to the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Container,
    Label,
    Button,
    Switch,
    TextArea,
    Image,
    Spinner,
    /// On-screen keyboard
    Keyboard,
    /// Top bar with clock and status icons
    Statusbar,
}

/// A widget.
///
/// Visual properties are public; structure (parent, children) only changes
/// through [`WidgetTree`].
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub text: Option<String>,
    pub hidden: bool,
    /// Share of the free space along the parent's main axis (0 = fixed size)
    pub flex_grow: u8,
    /// Switch state
    pub checked: bool,
    /// Keyboard input target
    pub target: Option<NodeId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            text: None,
            hidden: false,
            flex_grow: 0,
            checked: false,
            target: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The rendering engine's object tree.
pub struct WidgetTree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    /// Bumped on every structural change
    revision: u64,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    /// A tree holding only the root container.
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(NodeKind::Container, None));
        Self {
            nodes,
            root,
            next_id: 1,
            revision: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Structural revision; changes whenever nodes are created or deleted.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Create a `kind` node as the last child of `parent`.
    pub fn create(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, RenderError> {
        let id = NodeId(self.next_id);
        self.node_mut(parent)?.children.push(id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(kind, Some(parent)));
        self.revision += 1;
        Ok(id)
    }

    /// Create a label with `text` under `parent`.
    pub fn create_label(&mut self, parent: NodeId, text: &str) -> Result<NodeId, RenderError> {
        let id = self.create(parent, NodeKind::Label)?;
        self.set_text(id, text)?;
        Ok(id)
    }

    /// Delete `id` and its whole subtree.
    pub fn delete(&mut self, id: NodeId) -> Result<(), RenderError> {
        if id == self.root {
            return Err(RenderError::RootNotDeletable);
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|&child| child != id);
        }
        self.remove_subtree(id);
        self.revision += 1;
        Ok(())
    }

    /// Delete every child of `id`, keeping `id` itself.
    pub fn clean(&mut self, id: NodeId) -> Result<(), RenderError> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.remove_subtree(child);
        }
        self.revision += 1;
        Ok(())
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), RenderError> {
        self.node_mut(id)?.text = Some(text.to_string());
        Ok(())
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<(), RenderError> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    pub fn set_flex_grow(&mut self, id: NodeId, grow: u8) -> Result<(), RenderError> {
        self.node_mut(id)?.flex_grow = grow;
        Ok(())
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), RenderError> {
        self.node_mut(id)?.checked = checked;
        Ok(())
    }

    /// Point a keyboard node at the text area it types into.
    pub fn set_target(&mut self, id: NodeId, target: Option<NodeId>) -> Result<(), RenderError> {
        if let Some(target) = target {
            self.node(target)?;
        }
        self.node_mut(id)?.target = target;
        Ok(())
    }

    /// Children of `id`, in creation order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], RenderError> {
        Ok(&self.node(id)?.children)
    }

    /// First node of `kind` in the subtree under `from` (depth-first).
    pub fn find(&self, from: NodeId, kind: NodeKind) -> Option<NodeId> {
        let node = self.nodes.get(&from)?;
        if node.kind == kind {
            return Some(from);
        }
        node.children.iter().find_map(|&child| self.find(child, kind))
    }

    /// Serializable copy of the whole tree.
    pub fn snapshot(&self, width: u32, height: u32) -> FrameSnapshot {
        FrameSnapshot::new(width, height, self.snapshot_node(self.root))
    }

    fn snapshot_node(&self, id: NodeId) -> SnapshotNode {
        // Every id reachable from the root is live
        let node = &self.nodes[&id];
        SnapshotNode {
            kind: node.kind,
            text: node.text.clone(),
            hidden: node.hidden,
            flex_grow: node.flex_grow,
            checked: node.checked,
            children: node
                .children
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, RenderError> {
        self.nodes.get(&id).ok_or(RenderError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, RenderError> {
        self.nodes.get_mut(&id).ok_or(RenderError::UnknownNode(id))
    }
}

impl fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetTree")
            .field("nodes", &self.nodes.len())
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_root() {
        let tree = WidgetTree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(tree.root()).unwrap().kind, NodeKind::Container);
        assert!(tree.children(tree.root()).unwrap().is_empty());
    }

    #[test]
    fn test_create_children_in_order() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let a = tree.create_label(root, "a").unwrap();
        let b = tree.create(root, NodeKind::Button).unwrap();

        assert_eq!(tree.children(root).unwrap(), &[a, b]);
        assert_eq!(tree.get(a).unwrap().parent(), Some(root));
        assert_eq!(tree.get(a).unwrap().text.as_deref(), Some("a"));
    }

    #[test]
    fn test_create_under_unknown_parent() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let child = tree.create(root, NodeKind::Container).unwrap();
        tree.delete(child).unwrap();

        assert_eq!(
            tree.create(child, NodeKind::Label),
            Err(RenderError::UnknownNode(child))
        );
    }

    #[test]
    fn test_delete_removes_subtree() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let wrapper = tree.create(root, NodeKind::Container).unwrap();
        let label = tree.create_label(wrapper, "x").unwrap();

        tree.delete(wrapper).unwrap();
        assert!(!tree.contains(wrapper));
        assert!(!tree.contains(label));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.delete(root), Err(RenderError::RootNotDeletable));
    }

    #[test]
    fn test_clean_keeps_node() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let wrapper = tree.create(root, NodeKind::Container).unwrap();
        tree.create_label(wrapper, "one").unwrap();
        tree.create_label(wrapper, "two").unwrap();
        let before = tree.revision();

        tree.clean(wrapper).unwrap();
        assert!(tree.contains(wrapper));
        assert!(tree.children(wrapper).unwrap().is_empty());
        assert_eq!(tree.len(), 2);
        assert!(tree.revision() > before);
    }

    #[test]
    fn test_find_by_kind() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let wrapper = tree.create(root, NodeKind::Container).unwrap();
        let keyboard = tree.create(wrapper, NodeKind::Keyboard).unwrap();

        assert_eq!(tree.find(root, NodeKind::Keyboard), Some(keyboard));
        assert_eq!(tree.find(root, NodeKind::Statusbar), None);
    }

    #[test]
    fn test_keyboard_target_must_exist() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let keyboard = tree.create(root, NodeKind::Keyboard).unwrap();
        let input = tree.create(root, NodeKind::TextArea).unwrap();

        tree.set_target(keyboard, Some(input)).unwrap();
        assert_eq!(tree.get(keyboard).unwrap().target, Some(input));

        tree.delete(input).unwrap();
        assert_eq!(
            tree.set_target(keyboard, Some(input)),
            Err(RenderError::UnknownNode(input))
        );
    }
}
