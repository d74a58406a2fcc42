//! Turns a tiling tree plus a container rect into flat lists of window
//! frames and split handles for the renderer.

use serde::{Deserialize, Serialize};

use crate::model::geometry::Rect;
use crate::model::graph::Orientation;
use crate::model::tree::{Branch, NodeId, TilingNode, TilingTree};
use crate::model::window::WindowId;

/// Final rectangle for one tiled window plus the root path to its leaf
/// (used by the renderer for keying and hit-testing).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub window: WindowId,
    pub rect: Rect,
    pub path: Vec<Branch>,
}

/// Draggable divider between the two children of a split. The rect is the
/// `2 * gap` band centered on the split line; its path routes ratio drags
/// back to the split via `TilingTree::update_ratio`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitHandle {
    pub rect: Rect,
    pub orientation: Orientation,
    pub path: Vec<Branch>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub windows: Vec<WindowFrame>,
    pub splits: Vec<SplitHandle>,
}

/// Compiles `tree` against `container`. Pure and total: an empty tree
/// yields an empty layout, and no input can fail.
///
/// Leaves are inset by `gap` on all sides. A split divides its box along
/// its orientation, giving `first` the `ratio` fraction of the primary
/// axis, and emits a handle over the gap band between the two children.
/// Emission is pre-order: a split precedes everything beneath it and
/// windows appear in leaf order.
///
/// Fullscreen promotion is deliberately not applied here; it depends on
/// window flags the tree does not carry. See `LayoutEngine::calculate_layout`.
pub fn compute_layout(tree: &TilingTree, container: Rect, gap: f64) -> TreeLayout {
    let mut layout = TreeLayout::default();
    if let Some(root) = tree.root() {
        walk(tree, root, container, gap, Vec::new(), &mut layout);
    }
    layout
}

fn walk(
    tree: &TilingTree,
    node: NodeId,
    rect: Rect,
    gap: f64,
    path: Vec<Branch>,
    out: &mut TreeLayout,
) {
    match tree.node(node) {
        Some(&TilingNode::Leaf { window }) => {
            out.windows.push(WindowFrame { window, rect: rect.inset(gap), path });
        }
        Some(&TilingNode::Split { orientation, ratio, first, second }) => {
            let (first_rect, second_rect, handle) = partition(rect, orientation, ratio, gap);
            out.splits.push(SplitHandle { rect: handle, orientation, path: path.clone() });
            let mut first_path = path.clone();
            first_path.push(Branch::First);
            walk(tree, first, first_rect, gap, first_path, out);
            let mut second_path = path;
            second_path.push(Branch::Second);
            walk(tree, second, second_rect, gap, second_path, out);
        }
        None => {}
    }
}

/// Splits `rect` along `orientation` at `ratio` and returns the two child
/// boxes plus the handle band centered on the split line.
fn partition(rect: Rect, orientation: Orientation, ratio: f64, gap: f64) -> (Rect, Rect, Rect) {
    match orientation {
        Orientation::Horizontal => {
            let split_x = rect.x + rect.width * ratio;
            let first = Rect::new(rect.x, rect.y, rect.width * ratio, rect.height);
            let second = Rect::new(split_x, rect.y, rect.width * (1.0 - ratio), rect.height);
            let handle =
                Rect::new(split_x - gap, rect.y + gap, gap * 2.0, rect.height - gap * 2.0);
            (first, second, handle)
        }
        Orientation::Vertical => {
            let split_y = rect.y + rect.height * ratio;
            let first = Rect::new(rect.x, rect.y, rect.width, rect.height * ratio);
            let second = Rect::new(rect.x, split_y, rect.width, rect.height * (1.0 - ratio));
            let handle =
                Rect::new(rect.x + gap, split_y - gap, rect.width - gap * 2.0, gap * 2.0);
            (first, second, handle)
        }
    }
}
