//! Rotations and the two fixup procedures that restore red-black balance.
//!
//! Every case is written for one orientation and mirrored through
//! [`Side::opposite`], so left and right variants cannot drift apart.

use std::fmt;

use generational_arena::Index;
use tracing::trace;

use crate::domain::node::{Color, Side};
use crate::domain::trace::TraceOp;
use crate::domain::tree::RedBlackTree;

impl<T: Ord + Clone + fmt::Debug> RedBlackTree<T> {
    /// Moves `x` down toward `dir`; its child on the opposite side takes its place.
    /// A rotation toward an absent child is a no-op.
    fn rotate(&mut self, x: Index, dir: Side) {
        let Some(y) = self.arena[x].child(dir.opposite()) else {
            return;
        };

        let inner = self.arena[y].child(dir);
        self.arena[x].set_child(dir.opposite(), inner);
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(parent) => {
                let side = self.side_of(Some(x), parent);
                self.arena[parent].set_child(side, Some(y));
            }
        }

        self.arena[y].set_child(dir, Some(x));
        self.arena[x].parent = Some(y);

        let op = match dir {
            Side::Left => TraceOp::RotateLeft,
            Side::Right => TraceOp::RotateRight,
        };
        trace!(?op, "rotation");
        self.trace(op, Some(y), |tree| {
            format!(
                "rotate {dir} at {:?}: {:?} moves up",
                tree.arena[x].value, tree.arena[y].value
            )
        });
    }

    /// Restores the invariants after `node` was linked in as a red leaf.
    pub(super) fn insert_fixup(&mut self, mut node: Index) {
        while let Some(parent) = self.parent(node) {
            if self.arena[parent].color.is_black() {
                break;
            }
            // A red parent without a grandparent only occurs in seeded trees;
            // painting the root black below settles it.
            let Some(grand) = self.parent(parent) else {
                break;
            };

            let side = self.side_of(Some(parent), grand);
            let uncle = self.arena[grand].child(side.opposite());

            if let (Some(uncle), Color::Red) = (uncle, self.color(uncle)) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                self.trace(TraceOp::RedUncle, Some(grand), |tree| {
                    format!(
                        "uncle {:?} is red: recolor parent and uncle black, grandparent {:?} red",
                        tree.arena[uncle].value, tree.arena[grand].value
                    )
                });
                node = grand;
                continue;
            }

            let mut parent = parent;
            if self.arena[parent].child(side.opposite()) == Some(node) {
                self.trace(TraceOp::Triangle, Some(node), |tree| {
                    format!(
                        "{:?} is an inner grandchild: rotate {side} at parent {:?}",
                        tree.arena[node].value, tree.arena[parent].value
                    )
                });
                self.rotate(parent, side);
                node = parent;
                parent = match self.parent(node) {
                    Some(p) => p,
                    None => break,
                };
            }

            self.set_color(parent, Color::Black);
            self.set_color(grand, Color::Red);
            self.trace(TraceOp::Line, Some(parent), |tree| {
                format!(
                    "uncle is black: parent {:?} black, grandparent {:?} red, rotate {} at grandparent",
                    tree.arena[parent].value,
                    tree.arena[grand].value,
                    side.opposite()
                )
            });
            self.rotate(grand, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            if self.arena[root].color.is_red() {
                self.set_color(root, Color::Black);
                self.trace(TraceOp::RecolorRoot, Some(root), |tree| {
                    format!("paint root {:?} black", tree.arena[root].value)
                });
            }
        }
    }

    /// Restores black heights after a black node was unlinked.
    ///
    /// `x` is the child that took the unlinked node's place and `parent` its
    /// parent; both are tracked explicitly since `x` may be the sentinel.
    pub(super) fn delete_fixup(&mut self, mut x: Option<Index>, mut parent: Option<Index>) {
        while x != self.root && self.color(x).is_black() {
            let Some(p) = parent else {
                break;
            };
            let side = self.side_of(x, p);
            let mut sibling = self.arena[p].child(side.opposite());

            if let (Some(s), Color::Red) = (sibling, self.color(sibling)) {
                self.set_color(s, Color::Black);
                self.set_color(p, Color::Red);
                self.trace(TraceOp::RedSibling, Some(s), |tree| {
                    format!(
                        "case 1: sibling {:?} is red, recolor and rotate {side} at parent {:?}",
                        tree.arena[s].value, tree.arena[p].value
                    )
                });
                self.rotate(p, side);
                sibling = self.arena[p].child(side.opposite());
            }

            let Some(mut s) = sibling else {
                // Only reachable in malformed seeded trees: push the deficiency up.
                x = Some(p);
                parent = self.parent(p);
                continue;
            };

            let near = self.arena[s].child(side);
            let far = self.arena[s].child(side.opposite());

            if self.color(near).is_black() && self.color(far).is_black() {
                self.set_color(s, Color::Red);
                self.trace(TraceOp::BlackNephews, Some(p), |tree| {
                    format!(
                        "case 2: sibling {:?} has black children, paint it red and move up to {:?}",
                        tree.arena[s].value, tree.arena[p].value
                    )
                });
                x = Some(p);
                parent = self.parent(p);
                continue;
            }

            if self.color(far).is_black() {
                if let Some(n) = near {
                    self.set_color(n, Color::Black);
                    self.set_color(s, Color::Red);
                    self.trace(TraceOp::NearNephew, Some(n), |tree| {
                        format!(
                            "case 3: near nephew {:?} is red, rotate {} at sibling {:?}",
                            tree.arena[n].value,
                            side.opposite(),
                            tree.arena[s].value
                        )
                    });
                    self.rotate(s, side.opposite());
                    s = n;
                }
            }

            let parent_color = self.arena[p].color;
            self.set_color(s, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far) = self.arena[s].child(side.opposite()) {
                self.set_color(far, Color::Black);
            }
            self.trace(TraceOp::FarNephew, Some(s), |tree| {
                format!(
                    "case 4: far nephew is red, sibling {:?} takes the parent's color, rotate {side} at {:?}",
                    tree.arena[s].value, tree.arena[p].value
                )
            });
            self.rotate(p, side);
            x = self.root;
            parent = None;
        }

        if let Some(x) = x {
            if self.arena[x].color.is_red() {
                self.set_color(x, Color::Black);
                self.trace(TraceOp::Absorb, Some(x), |tree| {
                    format!("paint {:?} black to absorb the missing black", tree.arena[x].value)
                });
            }
        }
    }
}
