//! The fixed, numbered set of workspaces and their trees.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::common::collections::BTreeMap;
use crate::common::config::{MAX_WORKSPACES, WorkspaceSettings};
use crate::model::graph::Orientation;
use crate::model::tree::TilingTree;
use crate::model::window::WindowId;

/// Numbered workspace slot, 1-based. The set is fixed at construction;
/// there is no create/destroy at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("workspace {0:?} does not exist")]
    WorkspaceNotFound(WorkspaceId),
    #[error("window {0:?} is not tracked")]
    WindowNotFound(WindowId),
}

#[derive(Debug, Default)]
pub struct Workspace {
    pub name: String,
    pub tree: TilingTree,
    /// Orientation consumed by the next insertion: a split created while
    /// this is Horizontal comes out Vertical, and vice versa. Advanced only
    /// when an insertion actually creates a split.
    pub last_split: Orientation,
}

#[derive(Debug, Default)]
pub struct WorkspaceRegistry {
    workspaces: BTreeMap<WorkspaceId, Workspace>,
}

impl WorkspaceRegistry {
    /// Builds slots 1..=count from the settings. Slots beyond the supplied
    /// names fall back to their number.
    pub fn new(settings: &WorkspaceSettings) -> Self {
        let count = settings.count.clamp(1, MAX_WORKSPACES);
        let workspaces = (1..=count)
            .map(|n| {
                let name = settings
                    .names
                    .get(n - 1)
                    .cloned()
                    .unwrap_or_else(|| n.to_string());
                (WorkspaceId(n), Workspace {
                    name,
                    tree: TilingTree::new(),
                    last_split: Orientation::Horizontal,
                })
            })
            .collect();
        debug!("created workspace registry with {count} slots");
        Self { workspaces }
    }

    pub fn contains(&self, id: WorkspaceId) -> bool { self.workspaces.contains_key(&id) }

    pub fn ids(&self) -> impl Iterator<Item = WorkspaceId> + '_ {
        self.workspaces.keys().copied()
    }

    pub fn get(&self, id: WorkspaceId) -> Option<&Workspace> { self.workspaces.get(&id) }

    pub fn get_mut(&mut self, id: WorkspaceId) -> Option<&mut Workspace> {
        self.workspaces.get_mut(&id)
    }

    pub fn try_get(&self, id: WorkspaceId) -> Result<&Workspace, WorkspaceError> {
        self.workspaces.get(&id).ok_or(WorkspaceError::WorkspaceNotFound(id))
    }

    pub fn try_get_mut(&mut self, id: WorkspaceId) -> Result<&mut Workspace, WorkspaceError> {
        self.workspaces.get_mut(&id).ok_or(WorkspaceError::WorkspaceNotFound(id))
    }

    /// The workspace whose tree currently holds `window`, if any. A window
    /// is tiled in at most one workspace.
    pub fn workspace_for_window(&self, window: WindowId) -> Option<WorkspaceId> {
        self.workspaces
            .iter()
            .find(|(_, ws)| ws.tree.contains_window(window))
            .map(|(&id, _)| id)
    }

    pub fn try_workspace_for_window(
        &self,
        window: WindowId,
    ) -> Result<WorkspaceId, WorkspaceError> {
        self.workspace_for_window(window).ok_or(WorkspaceError::WindowNotFound(window))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn settings(count: usize, names: &[&str]) -> WorkspaceSettings {
        WorkspaceSettings {
            count,
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn registry_builds_numbered_slots() {
        let registry = WorkspaceRegistry::new(&settings(3, &["main", "web"]));
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec![WorkspaceId(1), WorkspaceId(2), WorkspaceId(3)]);
        assert_eq!(registry.get(WorkspaceId(1)).unwrap().name, "main");
        assert_eq!(registry.get(WorkspaceId(2)).unwrap().name, "web");
        // No name supplied for slot 3.
        assert_eq!(registry.get(WorkspaceId(3)).unwrap().name, "3");
        assert!(registry.get(WorkspaceId(1)).unwrap().tree.is_empty());
    }

    #[test]
    fn count_is_clamped() {
        let registry = WorkspaceRegistry::new(&settings(0, &[]));
        assert_eq!(registry.ids().count(), 1);
        let registry = WorkspaceRegistry::new(&settings(100, &[]));
        assert_eq!(registry.ids().count(), MAX_WORKSPACES);
    }

    #[test]
    fn lookups_distinguish_missing_slots() {
        let mut registry = WorkspaceRegistry::new(&settings(2, &[]));
        assert!(registry.contains(WorkspaceId(2)));
        assert!(!registry.contains(WorkspaceId(3)));
        assert_eq!(
            registry.try_get(WorkspaceId(9)).unwrap_err(),
            WorkspaceError::WorkspaceNotFound(WorkspaceId(9))
        );
        assert!(registry.try_get_mut(WorkspaceId(1)).is_ok());
    }

    #[test]
    fn workspace_for_window_searches_trees() {
        let mut registry = WorkspaceRegistry::new(&settings(2, &[]));
        let mut arena: slotmap::SlotMap<WindowId, ()> = slotmap::SlotMap::with_key();
        let window = arena.insert(());

        assert_eq!(registry.workspace_for_window(window), None);
        assert_eq!(
            registry.try_workspace_for_window(window).unwrap_err(),
            WorkspaceError::WindowNotFound(window)
        );

        let ws = registry.get_mut(WorkspaceId(2)).unwrap();
        let last = ws.last_split;
        ws.tree.insert_window(window, None, last);
        assert_eq!(registry.workspace_for_window(window), Some(WorkspaceId(2)));
        assert_eq!(registry.try_workspace_for_window(window), Ok(WorkspaceId(2)));
    }
}
