pub mod geometry;
pub mod graph;
pub mod tree;
pub mod window;

pub use geometry::Rect;
pub use graph::{Direction, Orientation};
pub use tree::{Branch, InsertOutcome, NodeId, TilingNode, TilingTree};
pub use window::{WindowId, WindowRecord, WindowStore};
