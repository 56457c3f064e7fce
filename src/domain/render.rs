use std::fmt;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::document::Document;
use crate::domain::tree::RedBlackTree;

const NIL: &str = "nil";

/// Conversion into a printable `termtree` structure.
///
/// Nodes render as `value (R)` / `value (B)`. A node with a single child also
/// shows the missing side as `nil` so left and right stay distinguishable.
pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: fmt::Display> TreeRender for RedBlackTree<T> {
    fn to_tree_string(&self) -> Tree<String> {
        fn build<T: fmt::Display>(tree: &RedBlackTree<T>, idx: Option<Index>) -> Tree<String> {
            let Some(idx) = idx else {
                return Tree::new(NIL.to_string());
            };
            let node = &tree.arena[idx];
            let label = format!("{} ({})", node.value, tag(node.color.is_red()));
            if node.is_leaf() {
                Tree::new(label)
            } else {
                Tree::new(label).with_leaves([build(tree, node.left), build(tree, node.right)])
            }
        }

        match self.root {
            Some(_) => build(self, self.root),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

impl<T: fmt::Display> TreeRender for Document<T> {
    fn to_tree_string(&self) -> Tree<String> {
        fn build<T: fmt::Display>(doc: &Document<T>) -> Tree<String> {
            let Some(node) = doc.root() else {
                return Tree::new(NIL.to_string());
            };
            let label = format!("{} ({})", node.value, tag(node.color.is_red()));
            if node.left.is_empty() && node.right.is_empty() {
                Tree::new(label)
            } else {
                Tree::new(label).with_leaves([build(&node.left), build(&node.right)])
            }
        }

        if self.is_empty() {
            Tree::new("Empty tree".to_string())
        } else {
            build(self)
        }
    }
}

fn tag(red: bool) -> &'static str {
    if red {
        "R"
    } else {
        "B"
    }
}
