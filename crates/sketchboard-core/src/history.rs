//! Linear undo/redo over whole-store snapshots.

use crate::entities::{NoteEntity, ResponseCard, Stroke, TextEntity};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};

/// A deep copy of every entity collection at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub strokes: Vec<Stroke>,
    pub texts: Vec<TextEntity>,
    pub notes: Vec<NoteEntity>,
    pub cards: Vec<ResponseCard>,
}

/// Snapshot stack plus cursor.
///
/// A cursor of `None` is the empty canvas. Otherwise the snapshot at the
/// cursor is the displayed state. Committing truncates everything after the
/// cursor before appending.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    snapshots: Vec<HistorySnapshot>,
    cursor: Option<usize>,
}

impl HistoryManager {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the store's current contents as a new step.
    pub fn commit(&mut self, store: &EntityStore) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(store.snapshot());
        self.cursor = Some(self.snapshots.len() - 1);
        log::debug!("history commit, cursor {}", self.snapshots.len() - 1);
    }

    /// Step back one snapshot. Stepping back from the first snapshot clears
    /// the store. Returns false at the empty state.
    pub fn undo(&mut self, store: &mut EntityStore) -> bool {
        match self.cursor {
            None => false,
            Some(0) => {
                self.cursor = None;
                store.clear();
                log::debug!("undo to empty canvas");
                true
            }
            Some(cursor) => {
                let target = cursor - 1;
                store.restore(&self.snapshots[target]);
                self.cursor = Some(target);
                log::debug!("undo to cursor {}", target);
                true
            }
        }
    }

    /// Step forward one snapshot. Returns false at the newest snapshot.
    pub fn redo(&mut self, store: &mut EntityStore) -> bool {
        let target = self.cursor.map_or(0, |c| c + 1);
        let Some(snapshot) = self.snapshots.get(target) else {
            return false;
        };
        store.restore(snapshot);
        self.cursor = Some(target);
        log::debug!("redo to cursor {}", target);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.snapshots.len()
    }

    /// Index of the displayed snapshot; `None` for the empty canvas.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot at `index`.
    pub fn get(&self, index: usize) -> Option<&HistorySnapshot> {
        self.snapshots.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RgbaColor;
    use kurbo::Point;

    fn add_stroke(store: &mut EntityStore, x: f64) {
        store.add_stroke(Stroke::from_points(
            vec![Point::new(x, 0.0), Point::new(x, 10.0)],
            2.0,
            RgbaColor::black(),
        ));
    }

    #[test]
    fn test_undo_redo_empty_are_noops() {
        let mut history = HistoryManager::new();
        let mut store = EntityStore::new();
        assert!(!history.undo(&mut store));
        assert!(!history.redo(&mut store));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let mut history = HistoryManager::new();
        let mut store = EntityStore::new();
        for x in [0.0, 10.0, 20.0] {
            add_stroke(&mut store, x);
            history.commit(&store);
        }
        let before = store.clone();

        assert!(history.undo(&mut store));
        assert_ne!(store, before);
        assert!(history.redo(&mut store));
        assert_eq!(store, before);
        assert!(!history.redo(&mut store));
    }

    #[test]
    fn test_n_undos_empty_the_canvas() {
        let mut history = HistoryManager::new();
        let mut store = EntityStore::new();
        let n = 5;
        for i in 0..n {
            add_stroke(&mut store, i as f64);
            history.commit(&store);
        }
        for _ in 0..n {
            assert!(history.undo(&mut store));
        }
        assert_eq!(history.cursor(), None);
        assert!(store.strokes().is_empty());
        assert!(!history.undo(&mut store));
    }

    #[test]
    fn test_commit_after_undo_truncates_branch() {
        let mut history = HistoryManager::new();
        let mut store = EntityStore::new();
        // A, B, C
        for x in [0.0, 10.0, 20.0] {
            add_stroke(&mut store, x);
            history.commit(&store);
        }
        assert_eq!(history.cursor(), Some(2));

        history.undo(&mut store);
        history.undo(&mut store);
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(store.strokes().len(), 1);

        // D
        add_stroke(&mut store, 99.0);
        history.commit(&store);
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert!(!history.can_redo());

        let current = store.clone();
        assert!(!history.redo(&mut store));
        assert_eq!(store, current);
        assert_eq!(history.get(0).map(|s| s.strokes.len()), Some(1));
        assert_eq!(history.get(1).map(|s| s.strokes.len()), Some(2));
    }

    #[test]
    fn test_redo_from_empty_restores_first_snapshot() {
        let mut history = HistoryManager::new();
        let mut store = EntityStore::new();
        add_stroke(&mut store, 0.0);
        history.commit(&store);
        let first = store.clone();

        history.undo(&mut store);
        assert!(store.is_empty());
        assert!(history.can_redo());
        assert!(history.redo(&mut store));
        assert_eq!(store, first);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_commit_from_empty_cursor_drops_all_snapshots() {
        let mut history = HistoryManager::new();
        let mut store = EntityStore::new();
        add_stroke(&mut store, 0.0);
        history.commit(&store);
        history.undo(&mut store);

        add_stroke(&mut store, 5.0);
        history.commit(&store);
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
    }
}
