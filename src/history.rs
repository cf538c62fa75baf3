//! Undo/redo history for sculpt edits.
//!
//! Stores snapshots of point positions. Restoring a snapshot writes through
//! the point setters, so restored points are dirty and reach the render
//! buffers on the next commit like any other edit.

use crate::debug_log::debug_log;
use crate::mesh_points::MeshPointStore;

type Snapshot = Vec<[f32; 3]>;

/// Snapshot-based undo/redo history for point positions.
pub struct EditHistory {
    /// Stack of previous states (most recent at the end)
    past: Vec<Snapshot>,
    /// Stack of undone states available for redo (most recent at the end)
    future: Vec<Snapshot>,
    /// Maximum number of undo entries to keep
    max_entries: usize,
}

impl EditHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Run `edit` and record the store's positions from before it, but only
    /// if the edit reports a non-zero count of written points. Recording
    /// clears the redo stack. Returns the count.
    pub fn record_edit<F>(&mut self, store: &mut MeshPointStore, edit: F) -> usize
    where
        F: FnOnce(&mut MeshPointStore) -> usize,
    {
        let before = store.positions();
        let affected = edit(store);
        if affected > 0 {
            self.push(before);
        }
        affected
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.future.clear();
        self.past.push(snapshot);
        // Trim oldest entries if over capacity
        while self.past.len() > self.max_entries {
            self.past.remove(0);
        }
    }

    /// Restore the most recent recorded state. Returns false if there is
    /// nothing to undo or the store no longer matches the snapshot's size,
    /// in which case the whole history is dropped.
    pub fn undo(&mut self, store: &mut MeshPointStore) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        if previous.len() != store.len() {
            self.invalidate("undo", previous.len(), store.len());
            return false;
        }
        self.future.push(store.positions());
        restore(store, &previous);
        true
    }

    /// Re-apply the most recently undone state. Same failure rules as `undo`.
    pub fn redo(&mut self, store: &mut MeshPointStore) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        if next.len() != store.len() {
            self.invalidate("redo", next.len(), store.len());
            return false;
        }
        self.past.push(store.positions());
        restore(store, &next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    fn invalidate(&mut self, op: &str, snapshot_len: usize, store_len: usize) {
        debug_log(&format!(
            "[{}] snapshot has {} points, store has {}; clearing history",
            op, snapshot_len, store_len
        ));
        self.clear();
    }
}

/// Write back only the positions that differ, so untouched points stay clean.
fn restore(store: &mut MeshPointStore, snapshot: &[[f32; 3]]) {
    for (point, &position) in store.iter_mut().zip(snapshot) {
        if point.position() != position {
            point.set_position(position);
        }
    }
}
