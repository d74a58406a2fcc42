pub mod compiler;
pub mod engine;
pub mod workspaces;

pub use compiler::{SplitHandle, TreeLayout, WindowFrame, compute_layout};
pub use engine::{EventResponse, LayoutCommand, LayoutEngine, WorkspaceLayout};
pub use workspaces::{Workspace, WorkspaceError, WorkspaceId, WorkspaceRegistry};
