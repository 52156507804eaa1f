//! Hello World: a toolbar and a centered greeting.

use pane_render::{NodeId, WidgetTree};

use crate::context::AppContext;
use crate::manifest::AppManifest;
use crate::toolbar;

const TAG: &str = "hello_world";

pub const GREETING: &str = "Hello, world!";

pub static MANIFEST: AppManifest = AppManifest {
    on_show: Some(on_show),
    ..AppManifest::new("HelloWorld", "Hello World")
};

fn on_show(ctx: &AppContext, tree: &mut WidgetTree, parent: NodeId) {
    let built = toolbar::create(tree, parent, ctx).and_then(|_| tree.create_label(parent, GREETING));
    if let Err(e) = built {
        log::error!(target: TAG, "failed to build view: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::RecordingHost;
    use std::sync::Arc;

    #[test]
    fn test_shows_greeting() {
        let ctx = AppContext::new(&MANIFEST, None, Arc::new(RecordingHost::default()));
        let mut tree = WidgetTree::new();
        let root = tree.root();

        (MANIFEST.on_show.unwrap())(&ctx, &mut tree, root);

        let snapshot = tree.snapshot(320, 240);
        assert!(snapshot.root.contains_text("Hello World"));
        assert!(snapshot.root.contains_text(GREETING));
    }
}
