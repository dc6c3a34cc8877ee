//! Append-only history of game snapshots with a movable read cursor.
//!
//! The server pushes a complete snapshot after every state change; the
//! client appends each one and can rewind through them for inspection.
//! Rewinding is presentation-only -- protocol logic always works from
//! the latest snapshot. Appending moves the cursor to the new tail,
//! matching the live-follow behavior a player expects.

use caucus_types::Game;

/// Ordered, immutable sequence of snapshots plus a read cursor.
#[derive(Debug, Default)]
pub struct HistoryLog {
    snapshots: Vec<Game>,
    cursor: usize,
}

impl HistoryLog {
    /// Create an empty history.
    pub const fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: 0,
        }
    }

    /// Append a snapshot and snap the cursor to it.
    pub fn append(&mut self, snapshot: Game) {
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len().saturating_sub(1);
    }

    /// The snapshot under the cursor, if any exist yet.
    pub fn current(&self) -> Option<&Game> {
        self.snapshots.get(self.cursor)
    }

    /// The most recent snapshot, regardless of the cursor.
    pub fn latest(&self) -> Option<&Game> {
        self.snapshots.last()
    }

    /// Move the cursor one snapshot back in time.
    pub const fn back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one snapshot forward, stopping at the newest.
    pub fn forward(&mut self) {
        let next = self.cursor.saturating_add(1);
        if next < self.snapshots.len() {
            self.cursor = next;
        }
    }

    /// Jump the cursor to the oldest snapshot.
    pub const fn oldest(&mut self) {
        self.cursor = 0;
    }

    /// Jump the cursor to the newest snapshot.
    pub fn newest(&mut self) {
        self.cursor = self.snapshots.len().saturating_sub(1);
    }

    /// Current cursor position.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots recorded.
    pub const fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshots have arrived yet.
    pub const fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
