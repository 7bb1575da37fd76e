use termtree::Tree;
use tracing::instrument;

use crate::backends::dom::arena::{Document, NodeId};

/// Render a subtree as an indented tree for debugging.
pub trait TreeDisplay {
    fn to_tree_string(&self, root: NodeId) -> Tree<String>;
}

impl TreeDisplay for Document {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: NodeId) -> Tree<String> {
        fn build(document: &Document, id: NodeId, parent: &mut Tree<String>) {
            for &child_id in document.children(id) {
                if let Some(child) = document.node(child_id) {
                    let mut child_tree = Tree::new(child.data.to_string());
                    build(document, child_id, &mut child_tree);
                    parent.push(child_tree);
                }
            }
        }

        match self.node(root) {
            Some(node) => {
                let mut tree = Tree::new(node.data.to_string());
                build(self, root, &mut tree);
                tree
            }
            None => Tree::new(format!("unknown node {}", root)),
        }
    }
}
