//! Standard app toolbar: a title label and a close button.

use pane_render::{NodeId, NodeKind, RenderError, WidgetTree};

use crate::context::AppContext;

/// Text on the toolbar's close button
pub const CLOSE_LABEL: &str = "<";

/// Node handles of a created toolbar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toolbar {
    pub container: NodeId,
    pub title: NodeId,
    pub close: NodeId,
}

/// Create a toolbar titled with the app's name under `parent`.
pub fn create(
    tree: &mut WidgetTree,
    parent: NodeId,
    ctx: &AppContext,
) -> Result<Toolbar, RenderError> {
    create_with_title(tree, parent, ctx.manifest().name)
}

pub fn create_with_title(
    tree: &mut WidgetTree,
    parent: NodeId,
    title: &str,
) -> Result<Toolbar, RenderError> {
    let container = tree.create(parent, NodeKind::Container)?;
    let close = tree.create(container, NodeKind::Button)?;
    tree.set_text(close, CLOSE_LABEL)?;
    let title = tree.create_label(container, title)?;
    Ok(Toolbar {
        container,
        title,
        close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_layout() {
        let mut tree = WidgetTree::new();
        let root = tree.root();
        let toolbar = create_with_title(&mut tree, root, "Hello World").unwrap();

        assert_eq!(tree.children(toolbar.container).unwrap(), &[toolbar.close, toolbar.title]);
        assert_eq!(tree.get(toolbar.title).unwrap().text.as_deref(), Some("Hello World"));
        assert_eq!(tree.get(toolbar.close).unwrap().kind, NodeKind::Button);
    }
}
