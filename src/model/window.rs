//! Window records and the store that owns them.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::model::geometry::Rect;

slotmap::new_key_type! {
    /// Opaque id of one open application instance. Stable for the window's
    /// lifetime and never reused after it closes.
    pub struct WindowId;
}

/// Per-window state outside the tree. `is_floating` and `is_fullscreen`
/// layer independently: a tiled window sits in exactly one workspace tree,
/// a floating one is in no tree and draws its geometry from `float_rect`,
/// and fullscreen overrides the rendered rect without moving the window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub app_id: String,
    pub title: String,
    pub is_floating: bool,
    pub is_fullscreen: bool,
    pub float_rect: Option<Rect>,
}

#[derive(Clone, Debug, Default)]
pub struct WindowStore {
    records: SlotMap<WindowId, WindowRecord>,
}

impl WindowStore {
    pub fn new() -> Self { Self::default() }

    /// Creates a record for a new window of `app_id`. The title is the app
    /// id with its first character upper-cased.
    pub fn open(&mut self, app_id: &str) -> WindowId {
        self.records.insert(WindowRecord {
            app_id: app_id.to_string(),
            title: derive_title(app_id),
            is_floating: false,
            is_fullscreen: false,
            float_rect: None,
        })
    }

    pub fn close(&mut self, window: WindowId) -> bool {
        self.records.remove(window).is_some()
    }

    pub fn get(&self, window: WindowId) -> Option<&WindowRecord> { self.records.get(window) }

    pub fn get_mut(&mut self, window: WindowId) -> Option<&mut WindowRecord> {
        self.records.get_mut(window)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &WindowRecord)> {
        self.records.iter()
    }
}

fn derive_title(app_id: &str) -> String {
    let mut chars = app_id.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn open_derives_the_title() {
        let mut store = WindowStore::new();
        let id = store.open("terminal");
        let record = store.get(id).unwrap();
        assert_eq!(record.app_id, "terminal");
        assert_eq!(record.title, "Terminal");
        assert!(!record.is_floating);
        assert!(!record.is_fullscreen);
        assert_eq!(record.float_rect, None);
    }

    #[test]
    fn close_removes_the_record() {
        let mut store = WindowStore::new();
        let id = store.open("files");
        assert!(store.close(id));
        assert!(store.get(id).is_none());
        assert!(!store.close(id));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = WindowStore::new();
        let first = store.open("browser");
        store.close(first);
        let second = store.open("browser");
        assert_ne!(first, second);
        assert!(store.get(first).is_none());
        assert!(store.get(second).is_some());
    }

    #[test]
    fn empty_app_id_gets_an_empty_title() {
        let mut store = WindowStore::new();
        let id = store.open("");
        assert_eq!(store.get(id).unwrap().title, "");
    }
}
