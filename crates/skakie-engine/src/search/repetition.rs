//! Repetition detection.
//!
//! A position counts as a draw the first time it repeats: either it was
//! already reached in the game, or it is already on the current search
//! path. The root is never checked and never enters the path.

use std::collections::HashSet;

use crate::game::PositionKey;

/// Keys of every position the game has passed through, current one included.
#[derive(Debug, Clone, Default)]
pub struct GameHistory {
    keys: HashSet<PositionKey>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: PositionKey) {
        self.keys.insert(key);
    }

    pub fn contains(&self, key: PositionKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Game history plus the non-root positions on the current search path.
#[derive(Debug)]
pub struct RepetitionGuard<'a> {
    history: &'a GameHistory,
    path: HashSet<PositionKey>,
}

impl<'a> RepetitionGuard<'a> {
    pub fn new(history: &'a GameHistory) -> Self {
        Self {
            history,
            path: HashSet::new(),
        }
    }

    /// Whether reaching `key` below the root repeats a position.
    pub fn is_repeat(&self, key: PositionKey) -> bool {
        self.history.contains(key) || self.path.contains(&key)
    }

    /// Mark `key` as on the path. Every `enter` is paired with a `leave`.
    pub fn enter(&mut self, key: PositionKey) {
        let fresh = self.path.insert(key);
        debug_assert!(fresh, "position {key} entered twice on one path");
    }

    pub fn leave(&mut self, key: PositionKey) {
        let present = self.path.remove(&key);
        debug_assert!(present, "position {key} left without entering");
    }

    /// Number of positions currently on the path.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_positions_repeat() {
        let mut history = GameHistory::new();
        history.record(PositionKey(11));
        let guard = RepetitionGuard::new(&history);
        assert!(guard.is_repeat(PositionKey(11)));
        assert!(!guard.is_repeat(PositionKey(12)));
    }

    #[test]
    fn path_positions_repeat_until_left() {
        let history = GameHistory::new();
        let mut guard = RepetitionGuard::new(&history);
        guard.enter(PositionKey(5));
        assert!(guard.is_repeat(PositionKey(5)));
        assert_eq!(guard.depth(), 1);
        guard.leave(PositionKey(5));
        assert!(!guard.is_repeat(PositionKey(5)));
        assert_eq!(guard.depth(), 0);
    }
}
