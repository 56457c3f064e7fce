use std::cmp::Ordering;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::document::{Document, DocumentNode};
use crate::domain::node::{Color, Node, Side};
use crate::domain::trace::{TraceOp, TraceRecord, Tracer};

/// Red-black tree over an ordered value set.
///
/// Nodes live in a generational arena and refer to each other by [`Index`];
/// an absent index is the sentinel and reads as black. Duplicate inserts are
/// ignored, so the tree behaves as a set.
pub struct RedBlackTree<T> {
    pub(super) arena: Arena<Node<T>>,
    pub(super) root: Option<Index>,
    pub(super) tracer: Option<Tracer<T>>,
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RedBlackTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedBlackTree")
            .field("len", &self.arena.len())
            .field("root", &self.root.map(|idx| &self.arena[idx].value))
            .field("tracing", &self.tracer.as_ref().map(|t| t.label()))
            .finish()
    }
}

impl<T> RedBlackTree<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            tracer: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&Node<T>> {
        self.root.map(|idx| &self.arena[idx])
    }

    /// Color of a link slot; the sentinel is black.
    pub(super) fn color(&self, idx: Option<Index>) -> Color {
        idx.map_or(Color::Black, |idx| self.arena[idx].color)
    }

    pub(super) fn set_color(&mut self, idx: Index, color: Color) {
        self.arena[idx].color = color;
    }

    pub(super) fn parent(&self, idx: Index) -> Option<Index> {
        self.arena[idx].parent
    }

    /// Side of `parent` on which `child` hangs. An absent child is matched
    /// against the parent's left slot first.
    pub(super) fn side_of(&self, child: Option<Index>, parent: Index) -> Side {
        if self.arena[parent].left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn minimum(&self, mut idx: Index) -> Index {
        while let Some(left) = self.arena[idx].left {
            idx = left;
        }
        idx
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn walk<T>(tree: &RedBlackTree<T>, idx: Option<Index>) -> usize {
            match idx {
                None => 0,
                Some(idx) => {
                    let node = &tree.arena[idx];
                    1 + walk(tree, node.left).max(walk(tree, node.right))
                }
            }
        }
        walk(self, self.root)
    }

    /// Black nodes along the leftmost path from the root, sentinel excluded.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.arena[idx];
            if node.color.is_black() {
                count += 1;
            }
            cursor = node.left;
        }
        count
    }

    /// Values in ascending order.
    pub fn in_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.arena.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(idx) = cursor {
                stack.push(idx);
                cursor = self.arena[idx].left;
            }
            let Some(idx) = stack.pop() else {
                break;
            };
            out.push(&self.arena[idx].value);
            cursor = self.arena[idx].right;
        }
        out
    }

    pub fn is_tracing(&self) -> bool {
        self.tracer.is_some()
    }

    pub fn trace_label(&self) -> Option<&str> {
        self.tracer.as_ref().map(|t| t.label())
    }

    /// Starts a fresh trace. Records collected under a previous label are dropped.
    pub fn enable_tracing(&mut self, label: impl Into<String>) {
        let tracer = Tracer::new(label);
        debug!(label = tracer.label(), "tracing enabled");
        self.tracer = Some(tracer);
    }

    pub fn disable_tracing(&mut self) {
        self.tracer = None;
    }

    /// Returns the records collected since the last flush, in recording order.
    pub fn flush_trace(&mut self) -> Vec<TraceRecord<T>> {
        self.tracer.as_mut().map(Tracer::drain).unwrap_or_default()
    }

    /// Builds a tree from a document without checking any balancing invariant.
    pub fn from_document(document: Document<T>) -> Self {
        fn build<T>(
            arena: &mut Arena<Node<T>>,
            document: Document<T>,
            parent: Option<Index>,
        ) -> Option<Index> {
            let DocumentNode {
                value,
                color,
                left,
                right,
            } = *document.0?;
            let idx = arena.insert(Node::new(value, color, parent));
            let left = build(arena, left, Some(idx));
            let right = build(arena, right, Some(idx));
            let node = &mut arena[idx];
            node.left = left;
            node.right = right;
            Some(idx)
        }

        let mut arena = Arena::new();
        let root = build(&mut arena, document, None);
        Self {
            arena,
            root,
            tracer: None,
        }
    }
}

impl<T: Clone> RedBlackTree<T> {
    pub fn to_document(&self) -> Document<T> {
        self.subtree_document(self.root)
    }

    fn subtree_document(&self, idx: Option<Index>) -> Document<T> {
        match idx {
            None => Document::empty(),
            Some(idx) => {
                let node = &self.arena[idx];
                Document::node(
                    node.value.clone(),
                    node.color,
                    self.subtree_document(node.left),
                    self.subtree_document(node.right),
                )
            }
        }
    }

    /// Records a step if tracing is enabled. `describe` runs only in that case.
    pub(super) fn trace<F>(&mut self, operation: TraceOp, highlight: Option<Index>, describe: F)
    where
        F: FnOnce(&Self) -> String,
    {
        if self.tracer.is_none() {
            return;
        }
        let description = describe(self);
        let snapshot = self.to_document();
        let highlight = highlight.map(|idx| self.arena[idx].value.clone());
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.record(operation, description, snapshot, highlight);
        }
    }
}

impl<T: Ord> RedBlackTree<T> {
    fn find_index(&self, value: &T) -> Option<Index> {
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.arena[idx];
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(idx),
            };
        }
        None
    }

    pub fn find(&self, value: &T) -> Option<&Node<T>> {
        self.find_index(value).map(|idx| &self.arena[idx])
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_index(value).is_some()
    }
}

impl<T: Ord + Clone + fmt::Debug> RedBlackTree<T> {
    /// Inserts `value`; a value already present leaves the tree untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: T) {
        self.trace(TraceOp::Insert, None, |_| format!("insert {value:?}"));

        let Some(mut cursor) = self.root else {
            let idx = self.arena.insert(Node::new(value, Color::Black, None));
            self.root = Some(idx);
            self.trace(TraceOp::CreateRoot, Some(idx), |tree| {
                format!("empty tree: {:?} becomes the black root", tree.arena[idx].value)
            });
            return;
        };

        let side = loop {
            let side = match value.cmp(&self.arena[cursor].value) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    debug!("duplicate value ignored");
                    self.trace(TraceOp::Duplicate, Some(cursor), |_| {
                        format!("{value:?} is already present, nothing to do")
                    });
                    return;
                }
            };
            self.trace(TraceOp::Descend, Some(cursor), |tree| {
                let relation = if side == Side::Left { "<" } else { ">" };
                format!(
                    "{value:?} {relation} {:?}: go {side}",
                    tree.arena[cursor].value
                )
            });

            match self.arena[cursor].child(side) {
                Some(next) => cursor = next,
                None => break side,
            }
        };

        let idx = self.arena.insert(Node::new(value, Color::Red, Some(cursor)));
        self.arena[cursor].set_child(side, Some(idx));
        self.trace(TraceOp::Link, Some(idx), |tree| {
            format!(
                "attach red {:?} as {side} child of {:?}",
                tree.arena[idx].value, tree.arena[cursor].value
            )
        });

        self.insert_fixup(idx);
    }

    /// Removes `value`, returning whether it was present.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, value: &T) -> bool {
        self.trace(TraceOp::Remove, None, |_| format!("remove {value:?}"));

        let Some(target) = self.find_index(value) else {
            debug!("value not found");
            self.trace(TraceOp::NotFound, None, |_| {
                format!("{value:?} is not in the tree")
            });
            return false;
        };

        let doomed = match (self.arena[target].left, self.arena[target].right) {
            (Some(_), Some(right)) => {
                let successor = self.minimum(right);
                self.trace(TraceOp::Successor, Some(successor), |tree| {
                    format!(
                        "{value:?} has two children: its successor {:?} is unlinked instead",
                        tree.arena[successor].value
                    )
                });
                successor
            }
            _ => target,
        };

        let child = self.arena[doomed].left.or(self.arena[doomed].right);
        let parent = self.arena[doomed].parent;
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        match parent {
            None => self.root = child,
            Some(parent) => {
                let side = self.side_of(Some(doomed), parent);
                self.arena[parent].set_child(side, child);
            }
        }

        let Some(unlinked) = self.arena.remove(doomed) else {
            return false;
        };
        let unlinked_color = unlinked.color;
        if doomed != target {
            self.arena[target].value = unlinked.value;
        }
        self.trace(TraceOp::Unlink, child, |_| {
            format!("unlink {unlinked_color} node, its child takes its place")
        });

        if unlinked_color.is_red() {
            self.trace(TraceOp::RedUnlinked, None, |_| {
                "unlinked node was red: black heights unchanged".to_string()
            });
        } else {
            self.delete_fixup(child, parent);
        }
        true
    }

    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.trace(TraceOp::Clear, None, |_| "tree cleared".to_string());
    }
}

impl<T: Ord + Clone + fmt::Debug> Extend<T> for RedBlackTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord + Clone + fmt::Debug> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
