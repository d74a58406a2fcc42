//! The lifecycle state machine: window records, workspace trees and global
//! focus, driven by discrete user intents.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::config::{Config, Settings};
use crate::layout_engine::compiler::{self, SplitHandle, WindowFrame};
use crate::layout_engine::workspaces::{WorkspaceId, WorkspaceRegistry};
use crate::model::geometry::Rect;
use crate::model::graph::Direction;
use crate::model::tree::{Branch, InsertOutcome};
use crate::model::window::{WindowId, WindowRecord, WindowStore};

/// One discrete user intent against the engine. Serialized snake_case so
/// the input layer can feed these straight from key bindings or a wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    OpenWindow {
        app_id: String,
        workspace: WorkspaceId,
    },
    CloseWindow {
        window: WindowId,
        workspace: WorkspaceId,
    },
    FocusWindow {
        window: WindowId,
    },
    MoveFocus {
        direction: Direction,
        workspace: WorkspaceId,
    },
    ToggleFloat {
        window: WindowId,
        workspace: WorkspaceId,
    },
    ToggleFullscreen {
        window: WindowId,
    },
    UpdateSplitRatio {
        workspace: WorkspaceId,
        path: Vec<Branch>,
        ratio: f64,
    },
    UpdateFloatRect {
        window: WindowId,
        rect: Rect,
    },
    SwitchWorkspace {
        workspace: WorkspaceId,
    },
}

/// What the caller should do after a command: raise and focus this window.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    pub focus_window: Option<WindowId>,
}

/// Resolved render view of one workspace: tiled frames with the fullscreen
/// override already applied, the split handles, and every floating window
/// with its current rect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkspaceLayout {
    pub windows: Vec<WindowFrame>,
    pub splits: Vec<SplitHandle>,
    pub floating: Vec<(WindowId, Rect)>,
}

pub struct LayoutEngine {
    registry: WorkspaceRegistry,
    windows: WindowStore,
    focused_window: Option<WindowId>,
    active_workspace: WorkspaceId,
    settings: Settings,
}

impl LayoutEngine {
    pub fn new(config: &Config) -> Self {
        let registry = WorkspaceRegistry::new(&config.workspaces);
        let active_workspace = registry.ids().next().expect("registry has at least one slot");
        Self {
            registry,
            windows: WindowStore::new(),
            focused_window: None,
            active_workspace,
            settings: config.settings.clone(),
        }
    }

    pub fn handle_command(&mut self, command: LayoutCommand) -> EventResponse {
        debug!(?command);
        let before = self.focused_window;
        match command {
            LayoutCommand::OpenWindow { app_id, workspace } => {
                let _ = self.open_window(&app_id, workspace);
            }
            LayoutCommand::CloseWindow { window, workspace } => {
                self.close_window(window, workspace)
            }
            LayoutCommand::FocusWindow { window } => self.focus_window(window),
            LayoutCommand::MoveFocus { direction, workspace } => {
                let _ = self.move_focus(direction, workspace);
            }
            LayoutCommand::ToggleFloat { window, workspace } => {
                self.toggle_float(window, workspace)
            }
            LayoutCommand::ToggleFullscreen { window } => self.toggle_fullscreen(window),
            LayoutCommand::UpdateSplitRatio { workspace, path, ratio } => {
                let _ = self.update_split_ratio(workspace, &path, ratio);
            }
            LayoutCommand::UpdateFloatRect { window, rect } => {
                self.update_float_rect(window, rect)
            }
            LayoutCommand::SwitchWorkspace { workspace } => self.switch_workspace(workspace),
        }
        if self.focused_window == before {
            EventResponse::default()
        } else {
            EventResponse { focus_window: self.focused_window }
        }
    }

    /// Creates a record for a new window of `app_id`, tiles it next to the
    /// current focus and focuses it. Returns None without any state change
    /// when the workspace does not exist.
    pub fn open_window(&mut self, app_id: &str, workspace: WorkspaceId) -> Option<WindowId> {
        let focused = self.focused_window;
        let ws = match self.registry.try_get_mut(workspace) {
            Ok(ws) => ws,
            Err(err) => {
                debug!("ignoring open_window: {err}");
                return None;
            }
        };
        let window = self.windows.open(app_id);
        let outcome = ws.tree.insert_window(window, focused, ws.last_split);
        if let InsertOutcome::SplitCreated(orientation) = outcome {
            ws.last_split = orientation;
        }
        debug!(?window, ?workspace, ?outcome, "opened window");
        self.focused_window = Some(window);
        Some(window)
    }

    /// Closes a window. A tiled window is removed from the workspace tree
    /// (collapsing its split); a floating one was never in the tree. When
    /// the closed window held focus, floating or not, focus moves to the
    /// first pre-order leaf of the workspace tree, or clears if the tree
    /// is empty.
    pub fn close_window(&mut self, window: WindowId, workspace: WorkspaceId) {
        let ws = match self.registry.try_get_mut(workspace) {
            Ok(ws) => ws,
            Err(err) => {
                debug!("ignoring close_window: {err}");
                return;
            }
        };
        let Some(record) = self.windows.get(window) else {
            debug!(?window, "ignoring close_window for unknown window");
            return;
        };
        let removed = record.is_floating || ws.tree.remove_window(window);
        let new_focus = ws.tree.first_leaf();
        if !removed {
            // Caller contract violation: the record goes away regardless,
            // but no other workspace's tree is touched.
            match self.registry.try_workspace_for_window(window) {
                Ok(tiled_in) => {
                    debug!(?window, ?tiled_in, "closing window tiled in another workspace")
                }
                Err(err) => debug!("closing window absent from every tree: {err}"),
            }
        }
        self.windows.close(window);
        if self.focused_window == Some(window) {
            self.focused_window = new_focus;
        }
    }

    /// Unconditionally sets the global focus. The caller supplies a valid,
    /// currently open id.
    pub fn focus_window(&mut self, window: WindowId) { self.focused_window = Some(window); }

    /// Moves focus to the neighbor of the focused window in the workspace's
    /// pre-order leaf sequence. Focus only changes when a neighbor exists.
    pub fn move_focus(&mut self, direction: Direction, workspace: WorkspaceId) -> Option<WindowId> {
        let ws = match self.registry.try_get(workspace) {
            Ok(ws) => ws,
            Err(err) => {
                debug!("ignoring move_focus: {err}");
                return None;
            }
        };
        let current = self.focused_window?;
        let neighbor = ws.tree.adjacent_window(current, direction)?;
        self.focused_window = Some(neighbor);
        Some(neighbor)
    }

    /// Pulls a tiled window out of the tree into a floating rect, or tiles
    /// a floating window back in next to the current focus. The float rect
    /// is reset to the configured default on every tile-to-float
    /// transition; re-tiling never advances the workspace's `last_split`.
    pub fn toggle_float(&mut self, window: WindowId, workspace: WorkspaceId) {
        let float = self.settings.float.clone();
        let focused = self.focused_window;
        let ws = match self.registry.try_get_mut(workspace) {
            Ok(ws) => ws,
            Err(err) => {
                debug!("ignoring toggle_float: {err}");
                return;
            }
        };
        let Some(record) = self.windows.get_mut(window) else {
            debug!(?window, "ignoring toggle_float for unknown window");
            return;
        };
        if record.is_floating {
            record.is_floating = false;
            record.float_rect = None;
            let outcome = ws.tree.insert_window(window, focused, ws.last_split);
            debug!(?window, ?outcome, "tiled floating window");
        } else {
            ws.tree.remove_window(window);
            record.is_floating = true;
            record.float_rect = Some(Rect::new(
                float.default_x,
                float.default_y,
                float.default_width,
                float.default_height,
            ));
            debug!(?window, "floated tiled window");
        }
    }

    /// Flips the fullscreen flag. Tree membership is untouched; only the
    /// rendered rect changes, in [`LayoutEngine::calculate_layout`].
    pub fn toggle_fullscreen(&mut self, window: WindowId) {
        let Some(record) = self.windows.get_mut(window) else {
            debug!(?window, "ignoring toggle_fullscreen for unknown window");
            return;
        };
        record.is_fullscreen = !record.is_fullscreen;
    }

    /// Routes a ratio drag to the split addressed by `path` in the
    /// workspace's tree. Returns whether anything was stored.
    pub fn update_split_ratio(
        &mut self,
        workspace: WorkspaceId,
        path: &[Branch],
        ratio: f64,
    ) -> bool {
        match self.registry.try_get_mut(workspace) {
            Ok(ws) => ws.tree.update_ratio(path, ratio),
            Err(err) => {
                debug!("ignoring update_split_ratio: {err}");
                false
            }
        }
    }

    /// Overwrites the float rect of a floating (or previously floating)
    /// window, clamping width and height to the configured minimums. Drag
    /// streams call this once per position update; last write wins.
    pub fn update_float_rect(&mut self, window: WindowId, rect: Rect) {
        let float = &self.settings.float;
        let clamped = Rect::new(
            rect.x,
            rect.y,
            rect.width.max(float.min_width),
            rect.height.max(float.min_height),
        );
        let Some(record) = self.windows.get_mut(window) else {
            debug!(?window, "ignoring update_float_rect for unknown window");
            return;
        };
        record.float_rect = Some(clamped);
    }

    /// Makes `workspace` the one the shell shows. Focus is untouched and
    /// unknown ids are ignored.
    pub fn switch_workspace(&mut self, workspace: WorkspaceId) {
        if self.registry.contains(workspace) {
            self.active_workspace = workspace;
        } else {
            debug!(?workspace, "ignoring switch_workspace for unknown workspace");
        }
    }

    pub fn active_workspace(&self) -> WorkspaceId { self.active_workspace }

    pub fn focused_window(&self) -> Option<WindowId> { self.focused_window }

    pub fn window(&self, window: WindowId) -> Option<&WindowRecord> { self.windows.get(window) }

    /// Windows tiled in the workspace's tree, in pre-order.
    pub fn windows_in(&self, workspace: WorkspaceId) -> Vec<WindowId> {
        self.registry.get(workspace).map(|ws| ws.tree.leaves()).unwrap_or_default()
    }

    pub fn workspace_name(&self, workspace: WorkspaceId) -> Option<&str> {
        self.registry.get(workspace).map(|ws| ws.name.as_str())
    }

    /// Compiles the workspace tree against `container` and resolves the
    /// flags the pure compiler cannot see: fullscreen windows get the
    /// container inset by the gap, floating windows are listed with their
    /// own rects. Unknown workspaces yield an empty layout.
    pub fn calculate_layout(&self, workspace: WorkspaceId, container: Rect) -> WorkspaceLayout {
        let Some(ws) = self.registry.get(workspace) else {
            return WorkspaceLayout::default();
        };
        let gap = self.settings.layout.gap;
        let compiled = compiler::compute_layout(&ws.tree, container, gap);
        let fullscreen_rect = container.inset(gap);

        let windows = compiled
            .windows
            .into_iter()
            .map(|mut frame| {
                if self.windows.get(frame.window).is_some_and(|r| r.is_fullscreen) {
                    frame.rect = fullscreen_rect;
                }
                frame
            })
            .collect();
        let floating = self
            .windows
            .iter()
            .filter(|(_, record)| record.is_floating)
            .filter_map(|(window, record)| {
                let rect = if record.is_fullscreen {
                    Some(fullscreen_rect)
                } else {
                    record.float_rect
                };
                rect.map(|rect| (window, rect))
            })
            .collect();

        WorkspaceLayout {
            windows,
            splits: compiled.splits,
            floating,
        }
    }

    pub fn draw_tree(&self, workspace: WorkspaceId) -> String {
        self.registry
            .get(workspace)
            .map(|ws| ws.tree.draw_tree())
            .unwrap_or_else(|| "<no workspace>".to_string())
    }

    #[cfg(test)]
    pub(crate) fn tree(&self, workspace: WorkspaceId) -> &crate::model::tree::TilingTree {
        &self.registry.get(workspace).unwrap().tree
    }

    #[cfg(test)]
    pub(crate) fn last_split(&self, workspace: WorkspaceId) -> crate::model::graph::Orientation {
        self.registry.get(workspace).unwrap().last_split
    }
}
