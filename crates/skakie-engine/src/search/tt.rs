//! Per-move caches keyed by [`PositionKey`].
//!
//! Both tables are cleared before every move decision, so nothing survives
//! from one `generate_move` call to the next.
//!
//! - [`TranspositionTable`]: best move of a main-search node, used only as
//!   an ordering hint. Never used for score cutoffs.
//! - [`QuiescenceTable`]: bounds on a quiescence node's value, stored as
//!   deltas from the node's static value so the same position reached with
//!   a different material baseline still reuses them.

use std::collections::HashMap;

use shakmaty::Move;

use crate::game::PositionKey;

/// Unbounded delta. Larger than any reachable score swing.
pub const Q_INFINITY: i32 = 10_000_000;

/// Main-search move hints.
#[derive(Default)]
pub struct TranspositionTable {
    entries: HashMap<PositionKey, Move>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best move last stored for `key`.
    pub fn probe(&self, key: PositionKey) -> Option<Move> {
        self.entries.get(&key).copied()
    }

    /// Record `mv` as the best move of `key`, replacing any older hint.
    pub fn store(&mut self, key: PositionKey, mv: Move) {
        self.entries.insert(key, mv);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Delta-encoded bounds for one quiescence position.
///
/// `lower <= upper` always holds. A fresh entry knows nothing:
/// `(-Q_INFINITY, +Q_INFINITY)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QttEntry {
    lower: i32,
    upper: i32,
    best_move: Option<Move>,
}

impl QttEntry {
    /// Absolute `(lower, upper)` bounds given this visit's static value.
    pub fn bounds(&self, static_value: i32) -> (i32, i32) {
        (
            static_value.saturating_add(self.lower),
            static_value.saturating_add(self.upper),
        )
    }

    pub fn lower_delta(&self) -> i32 {
        self.lower
    }

    pub fn upper_delta(&self) -> i32 {
        self.upper
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    /// The value is at most `static + delta`.
    pub fn tighten_upper(&mut self, delta: i32) {
        self.upper = self.upper.min(delta);
        if self.upper < self.lower {
            self.lower = self.upper;
        }
    }

    /// The value is at least `static + delta`, reached by `mv`.
    pub fn tighten_lower(&mut self, delta: i32, mv: Option<Move>) {
        self.lower = self.lower.max(delta);
        if self.lower > self.upper {
            self.upper = self.lower;
        }
        if mv.is_some() {
            self.best_move = mv;
        }
    }

    /// The value is exactly `static + delta`.
    pub fn set_exact(&mut self, delta: i32, mv: Option<Move>) {
        self.lower = delta;
        self.upper = delta;
        if mv.is_some() {
            self.best_move = mv;
        }
    }
}

impl Default for QttEntry {
    fn default() -> Self {
        Self {
            lower: -Q_INFINITY,
            upper: Q_INFINITY,
            best_move: None,
        }
    }
}

/// Quiescence bounds table.
#[derive(Default)]
pub struct QuiescenceTable {
    entries: HashMap<PositionKey, QttEntry>,
}

impl QuiescenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the entry for `key`, creating an unbounded one on first visit.
    pub fn entry(&mut self, key: PositionKey) -> &mut QttEntry {
        self.entries.entry(key).or_default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry keeps `lower <= upper`.
    pub fn is_consistent(&self) -> bool {
        self.entries.values().all(|e| e.lower <= e.upper)
    }
}

impl std::fmt::Debug for QuiescenceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuiescenceTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Role, Square};

    fn e2e4() -> Move {
        Move::Normal {
            role: Role::Pawn,
            from: Square::E2,
            capture: None,
            to: Square::E4,
            promotion: None,
        }
    }

    #[test]
    fn store_and_probe() {
        let mut tt = TranspositionTable::new();
        let key = PositionKey(0xDEAD_BEEF_1234_5678);
        tt.store(key, e2e4());
        assert_eq!(tt.probe(key), Some(e2e4()));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn probe_miss_returns_none() {
        let tt = TranspositionTable::new();
        assert!(tt.probe(PositionKey(1)).is_none());
    }

    #[test]
    fn clear_empties_table() {
        let mut tt = TranspositionTable::new();
        tt.store(PositionKey(7), e2e4());
        tt.clear();
        assert!(tt.is_empty());
    }

    #[test]
    fn fresh_entry_is_unbounded() {
        let mut qtt = QuiescenceTable::new();
        let entry = *qtt.entry(PositionKey(3));
        assert_eq!(entry.bounds(50), (50 - Q_INFINITY, 50 + Q_INFINITY));
        assert!(entry.best_move().is_none());
        assert_eq!(qtt.len(), 1);
    }

    #[test]
    fn bounds_follow_static_value() {
        let mut entry = QttEntry::default();
        entry.set_exact(120, Some(e2e4()));
        assert_eq!(entry.bounds(0), (120, 120));
        assert_eq!(entry.bounds(-300), (-180, -180));
        assert_eq!(entry.best_move(), Some(e2e4()));
    }

    #[test]
    fn upper_only_tightens() {
        let mut entry = QttEntry::default();
        entry.tighten_upper(40);
        entry.tighten_upper(90);
        assert_eq!(entry.upper_delta(), 40);
        assert_eq!(entry.lower_delta(), -Q_INFINITY);
    }

    #[test]
    fn crossing_bounds_collapse() {
        let mut entry = QttEntry::default();
        entry.tighten_lower(100, None);
        entry.tighten_upper(60);
        assert_eq!(entry.lower_delta(), 60);
        assert_eq!(entry.upper_delta(), 60);

        let mut entry = QttEntry::default();
        entry.tighten_upper(-20);
        entry.tighten_lower(10, Some(e2e4()));
        assert_eq!(entry.lower_delta(), 10);
        assert_eq!(entry.upper_delta(), 10);
    }

    #[test]
    fn lower_keeps_previous_move_when_none_given() {
        let mut entry = QttEntry::default();
        entry.tighten_lower(10, Some(e2e4()));
        entry.tighten_lower(20, None);
        assert_eq!(entry.best_move(), Some(e2e4()));
        assert_eq!(entry.lower_delta(), 20);
    }
}
