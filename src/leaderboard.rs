use crate::types::{Millis, ScoreEntry};

/// Default number of entries kept on the board
pub const DEFAULT_CAPACITY: usize = 10;

/// Best reaction times, fastest first, bounded in size.
///
/// Equal times keep insertion order, so an older entry stays ahead of a
/// newer one with the same time.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert a score and keep only the best `capacity` entries
    pub fn record_score(&mut self, name: impl Into<String>, time: Millis) {
        self.entries.push(ScoreEntry {
            name: name.into(),
            time,
        });
        // sort_by_key is stable
        self.entries.sort_by_key(|entry| entry.time);
        self.entries.truncate(self.capacity);
    }

    /// Copy of the current ordering
    pub fn snapshot(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
