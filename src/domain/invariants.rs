//! Red-black invariant checks.
//!
//! The engine never calls these; they back the test-suite and the `check`
//! command, which inspects seeded trees that may be unbalanced on purpose.

use std::fmt;

use generational_arena::Index;
use thiserror::Error;

use crate::domain::tree::RedBlackTree;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("root {0} is red")]
    RedRoot(String),

    #[error("red node {parent} has red child {child}")]
    RedRed { parent: String, child: String },

    #[error("black height differs below {node}: left {left}, right {right}")]
    BlackHeight {
        node: String,
        left: usize,
        right: usize,
    },

    #[error("order violated: {0} is not strictly below {1}")]
    Order(String, String),

    #[error("node {child} does not point back to parent {parent}")]
    ParentLink { parent: String, child: String },
}

/// Checks every structural invariant and returns the black height,
/// counting the sentinel level.
pub fn verify<T: Ord + fmt::Debug>(tree: &RedBlackTree<T>) -> Result<usize, InvariantViolation> {
    if let Some(root) = tree.root {
        let node = &tree.arena[root];
        if node.color.is_red() {
            return Err(InvariantViolation::RedRoot(format!("{:?}", node.value)));
        }
    }

    let values = tree.in_order();
    for pair in values.windows(2) {
        if pair[0] >= pair[1] {
            return Err(InvariantViolation::Order(
                format!("{:?}", pair[0]),
                format!("{:?}", pair[1]),
            ));
        }
    }

    black_height(tree, tree.root)
}

fn black_height<T: fmt::Debug>(
    tree: &RedBlackTree<T>,
    idx: Option<Index>,
) -> Result<usize, InvariantViolation> {
    let Some(idx) = idx else {
        return Ok(1);
    };
    let node = &tree.arena[idx];

    for child in [node.left, node.right].into_iter().flatten() {
        let child_node = &tree.arena[child];
        if child_node.parent != Some(idx) {
            return Err(InvariantViolation::ParentLink {
                parent: format!("{:?}", node.value),
                child: format!("{:?}", child_node.value),
            });
        }
        if node.color.is_red() && child_node.color.is_red() {
            return Err(InvariantViolation::RedRed {
                parent: format!("{:?}", node.value),
                child: format!("{:?}", child_node.value),
            });
        }
    }

    let left = black_height(tree, node.left)?;
    let right = black_height(tree, node.right)?;
    if left != right {
        return Err(InvariantViolation::BlackHeight {
            node: format!("{:?}", node.value),
            left,
            right,
        });
    }
    Ok(left + usize::from(node.color.is_black()))
}
