//! The tiling tree: a strict binary tree of window leaves and split
//! containers, stored in a slotmap arena.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::common::collections::HashMap;
use crate::model::graph::{Direction, Orientation};
use crate::model::window::WindowId;

pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;
pub const MIN_SPLIT_RATIO: f64 = 0.15;
pub const MAX_SPLIT_RATIO: f64 = 0.85;

slotmap::new_key_type! {
    /// Arena handle for a node in a [`TilingTree`].
    pub struct NodeId;
}

/// A node is either a window leaf or a split holding exactly two children.
/// `ratio` is the fraction of the primary axis allotted to `first`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilingNode {
    Leaf {
        window: WindowId,
    },
    Split {
        orientation: Orientation,
        ratio: f64,
        first: NodeId,
        second: NodeId,
    },
}

/// One first/second choice on a root-to-node path. Paths route ratio drags
/// from a rendered split handle back to the split that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    First,
    Second,
}

/// What an insertion did to the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// First window of an empty tree; no split involved.
    NewRoot,
    /// A split with this orientation was created to hold the new leaf.
    SplitCreated(Orientation),
    /// The tree was left untouched and the window dropped.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct TilingTree {
    nodes: SlotMap<NodeId, TilingNode>,
    window_to_node: HashMap<WindowId, NodeId>,
    root: Option<NodeId>,
}

impl TilingTree {
    pub fn new() -> Self { Self::default() }

    pub fn root(&self) -> Option<NodeId> { self.root }

    pub fn node(&self, id: NodeId) -> Option<&TilingNode> { self.nodes.get(id) }

    pub fn is_empty(&self) -> bool { self.root.is_none() }

    pub fn window_count(&self) -> usize { self.window_to_node.len() }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.window_to_node.contains_key(&window)
    }

    /// All leaf windows in pre-order (first subtree fully before second).
    /// This ordering is the tree's only notion of adjacency.
    pub fn leaves(&self) -> Vec<WindowId> {
        let mut out = Vec::with_capacity(self.window_to_node.len());
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut out);
        }
        out
    }

    pub fn first_leaf(&self) -> Option<WindowId> { self.extreme_leaf(Branch::First) }

    pub fn last_leaf(&self) -> Option<WindowId> { self.extreme_leaf(Branch::Second) }

    /// Inserts `window` next to the focused leaf. Any split created by one
    /// insertion uses the opposite of `last_direction`, computed once and
    /// independent of depth.
    ///
    /// With an empty tree the window becomes the root. With a leaf root the
    /// leaf is split in place when it is the focus (or no focus is given);
    /// a leaf root that is not the focus drops the window. With a split
    /// root the focused leaf is split in place wherever it sits; when the
    /// focus is absent from the tree a new split wraps the entire existing
    /// tree as `first` with the new leaf as `second`.
    pub fn insert_window(
        &mut self,
        window: WindowId,
        focused: Option<WindowId>,
        last_direction: Orientation,
    ) -> InsertOutcome {
        if self.window_to_node.contains_key(&window) {
            // Already tiled here; keep leaves unique.
            return InsertOutcome::Ignored;
        }
        let Some(root) = self.root else {
            let leaf = self.nodes.insert(TilingNode::Leaf { window });
            self.window_to_node.insert(window, leaf);
            self.root = Some(leaf);
            return InsertOutcome::NewRoot;
        };
        let orientation = last_direction.flipped();
        match self.nodes.get(root) {
            Some(&TilingNode::Leaf { window: existing }) => match focused {
                Some(focus) if focus != existing => InsertOutcome::Ignored,
                _ => {
                    self.split_leaf(root, window, orientation);
                    InsertOutcome::SplitCreated(orientation)
                }
            },
            Some(&TilingNode::Split { .. }) => {
                let attach = focused.and_then(|focus| self.window_to_node.get(&focus).copied());
                match attach {
                    Some(leaf) => self.split_leaf(leaf, window, orientation),
                    None => {
                        let second = self.nodes.insert(TilingNode::Leaf { window });
                        self.window_to_node.insert(window, second);
                        let split = self.nodes.insert(TilingNode::Split {
                            orientation,
                            ratio: DEFAULT_SPLIT_RATIO,
                            first: root,
                            second,
                        });
                        self.root = Some(split);
                    }
                }
                InsertOutcome::SplitCreated(orientation)
            }
            None => InsertOutcome::Ignored,
        }
    }

    /// Removes the leaf holding `window`, collapsing its parent split so
    /// that the sibling subtree takes the parent's place. Returns false if
    /// the window is not in the tree.
    pub fn remove_window(&mut self, window: WindowId) -> bool {
        if !self.window_to_node.contains_key(&window) {
            return false;
        }
        if let Some(root) = self.root {
            self.root = self.remove_from(root, window);
        }
        self.window_to_node.remove(&window);
        true
    }

    /// Walks `path` from the root and stores the clamped ratio at the split
    /// it lands on. A path that runs into a leaf, past the tree, or onto a
    /// leaf changes nothing.
    pub fn update_ratio(&mut self, path: &[Branch], ratio: f64) -> bool {
        if !ratio.is_finite() {
            return false;
        }
        let Some(mut node) = self.root else {
            return false;
        };
        for branch in path {
            match self.nodes.get(node) {
                Some(&TilingNode::Split { first, second, .. }) => {
                    node = match branch {
                        Branch::First => first,
                        Branch::Second => second,
                    };
                }
                _ => return false,
            }
        }
        match self.nodes.get_mut(node) {
            Some(TilingNode::Split { ratio: stored, .. }) => {
                *stored = ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
                true
            }
            _ => false,
        }
    }

    /// Neighbor of `current` in the pre-order leaf sequence. Left and Up
    /// step to the previous leaf, Right and Down to the next one; linear,
    /// not spatial.
    pub fn adjacent_window(&self, current: WindowId, direction: Direction) -> Option<WindowId> {
        let leaves = self.leaves();
        let idx = leaves.iter().position(|&w| w == current)?;
        if direction.is_forward() {
            leaves.get(idx + 1).copied()
        } else {
            idx.checked_sub(1).and_then(|i| leaves.get(i).copied())
        }
    }

    pub fn draw_tree(&self) -> String {
        let Some(root) = self.root else {
            return "<empty tree>".to_string();
        };
        let tree = self.ascii_node(root);
        let mut out = String::new();
        ascii_tree::write_tree(&mut out, &tree).unwrap();
        out
    }

    /// Replaces a leaf in place with a split holding the old window as
    /// `first` and the new one as `second`. The node id is unchanged, so
    /// whatever points at it (parent or root) needs no relinking.
    fn split_leaf(&mut self, node: NodeId, window: WindowId, orientation: Orientation) {
        let Some(&TilingNode::Leaf { window: existing }) = self.nodes.get(node) else {
            return;
        };
        let first = self.nodes.insert(TilingNode::Leaf { window: existing });
        let second = self.nodes.insert(TilingNode::Leaf { window });
        self.nodes[node] = TilingNode::Split {
            orientation,
            ratio: DEFAULT_SPLIT_RATIO,
            first,
            second,
        };
        self.window_to_node.insert(existing, first);
        self.window_to_node.insert(window, second);
    }

    /// Removes `window` below `node` and returns the surviving subtree, if
    /// any. A split left with a single child is freed and replaced by that
    /// child.
    fn remove_from(&mut self, node: NodeId, window: WindowId) -> Option<NodeId> {
        match self.nodes.get(node).copied() {
            Some(TilingNode::Leaf { window: w }) if w == window => {
                self.nodes.remove(node);
                None
            }
            Some(TilingNode::Leaf { .. }) => Some(node),
            Some(TilingNode::Split { orientation, ratio, first, second }) => {
                let first_result = self.remove_from(first, window);
                let second_result = self.remove_from(second, window);
                match (first_result, second_result) {
                    (None, None) => {
                        self.nodes.remove(node);
                        None
                    }
                    (Some(survivor), None) | (None, Some(survivor)) => {
                        self.nodes.remove(node);
                        Some(survivor)
                    }
                    (Some(f), Some(s)) => {
                        self.nodes[node] = TilingNode::Split {
                            orientation,
                            ratio,
                            first: f,
                            second: s,
                        };
                        Some(node)
                    }
                }
            }
            None => None,
        }
    }

    fn collect_leaves(&self, node: NodeId, out: &mut Vec<WindowId>) {
        match self.nodes.get(node) {
            Some(&TilingNode::Leaf { window }) => out.push(window),
            Some(&TilingNode::Split { first, second, .. }) => {
                self.collect_leaves(first, out);
                self.collect_leaves(second, out);
            }
            None => {}
        }
    }

    fn extreme_leaf(&self, side: Branch) -> Option<WindowId> {
        let mut node = self.root?;
        loop {
            match self.nodes.get(node)? {
                &TilingNode::Leaf { window } => return Some(window),
                &TilingNode::Split { first, second, .. } => {
                    node = match side {
                        Branch::First => first,
                        Branch::Second => second,
                    };
                }
            }
        }
    }

    fn ascii_node(&self, node: NodeId) -> ascii_tree::Tree {
        match self.nodes.get(node) {
            Some(&TilingNode::Leaf { window }) => {
                ascii_tree::Tree::Leaf(vec![format!("{window:?}")])
            }
            Some(&TilingNode::Split { orientation, ratio, first, second }) => {
                ascii_tree::Tree::Node(
                    format!("{orientation:?} {ratio:.2}"),
                    vec![self.ascii_node(first), self.ascii_node(second)],
                )
            }
            None => ascii_tree::Tree::Leaf(vec!["<missing>".to_string()]),
        }
    }
}
