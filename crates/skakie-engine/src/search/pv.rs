//! Triangular principal-variation table.

use shakmaty::Move;

/// Row `ply` holds the best line found from `ply` onward.
#[derive(Debug, Clone)]
pub struct PvTable {
    lines: Vec<Vec<Move>>,
}

impl PvTable {
    /// Table with room for `max_ply` plies.
    pub fn new(max_ply: usize) -> Self {
        Self {
            lines: vec![Vec::new(); max_ply + 1],
        }
    }

    /// Forget the line at `ply` (called on entry to each node).
    pub fn clear_ply(&mut self, ply: usize) {
        if let Some(line) = self.lines.get_mut(ply) {
            line.clear();
        }
    }

    /// Set row `ply` to `mv` followed by row `ply + 1`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= self.lines.len() {
            return;
        }
        let (head, tail) = self.lines.split_at_mut(ply + 1);
        let line = &mut head[ply];
        line.clear();
        line.push(mv);
        if let Some(child) = tail.first() {
            line.extend_from_slice(child);
        }
    }

    pub fn root_pv(&self) -> &[Move] {
        self.lines.first().map_or(&[], Vec::as_slice)
    }
}
