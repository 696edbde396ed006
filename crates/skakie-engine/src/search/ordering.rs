//! Move ordering for the main search and quiescence.
//!
//! Main-search keys fall into tiers of [`TIER`] so that no in-tier
//! adjustment can cross into a neighbouring tier:
//!
//! | Tier | Moves                                                   |
//! |------|---------------------------------------------------------|
//! | 6    | PV move from the previous depth                         |
//! | 5    | TT hint                                                 |
//! | 4    | winning capture: undefended target or bigger victim     |
//! | 3    | even capture: victim and mover of the same role         |
//! | 2    | quiet move to an undefended square                      |
//! | 1    | losing capture: smaller victim on a defended square     |
//! | 0    | quiet move to a defended square                         |
//!
//! Within a tier captures prefer the greatest victim and the least
//! attacker, and every move is nudged by the mover's piece-square gain.

use shakmaty::{Color, Move, MoveList, Square};

use crate::eval::material::{piece_value, promotion_gain, role_rank};
use crate::eval::pst::relative_pst;
use crate::game::Game;

/// Width of one ordering tier.
pub const TIER: i64 = 1 << 20;

const PV_MOVE: i64 = 6 * TIER;
const TT_MOVE: i64 = 5 * TIER;
const WINNING_CAPTURE: i64 = 4 * TIER;
const EVEN_CAPTURE: i64 = 3 * TIER;
const SAFE_QUIET: i64 = 2 * TIER;
const LOSING_CAPTURE: i64 = TIER;
const LOSING_QUIET: i64 = 0;

/// Square the moving piece lands on. Castling reports the king's target.
fn landing_square(mv: Move, mover: Color) -> Square {
    match mv.castling_side() {
        Some(side) => side.king_to(mover),
        None => mv.to(),
    }
}

/// Main-search ordering key. Higher is searched first.
pub fn search_key(game: &Game, mv: Move, pv_move: Option<Move>, tt_move: Option<Move>) -> i64 {
    if pv_move == Some(mv) {
        return PV_MOVE;
    }
    if tt_move == Some(mv) {
        return TT_MOVE;
    }

    let mover = game.side_to_move();
    let role = mv.role();
    let to = landing_square(mv, mover);
    let mover_value = i64::from(piece_value(role));
    let pst_gain = mv.from().map_or(0, |from| {
        i64::from(relative_pst(role, mover, to) - relative_pst(role, mover, from))
    });
    let defended = game.is_attacked_by(!mover, to);

    if !mv.is_capture() && !mv.is_promotion() {
        return if defended {
            LOSING_QUIET - mover_value + pst_gain
        } else {
            SAFE_QUIET + pst_gain
        };
    }

    // en passant reports a pawn as the captured role
    let victim_value = i64::from(mv.capture().map_or(0, piece_value));
    let victim_rank = mv.capture().map_or(0, role_rank);
    let mover_rank = role_rank(role);
    let gvla = (victim_value << 10) - mover_value;

    if !defended {
        let promotion = i64::from(mv.promotion().map_or(0, promotion_gain));
        WINNING_CAPTURE + gvla + pst_gain + promotion
    } else if victim_rank > mover_rank {
        WINNING_CAPTURE + gvla + pst_gain
    } else if victim_rank == mover_rank {
        EVEN_CAPTURE + victim_value + pst_gain
    } else {
        LOSING_CAPTURE + gvla + pst_gain
    }
}

/// Quiescence ordering key: greatest victim, least attacker, then best
/// promotion. Quiet check evasions score zero.
pub fn qsearch_key(mv: Move, in_check: bool) -> i32 {
    if in_check && !mv.is_capture() && !mv.is_promotion() {
        return 0;
    }
    let victim = mv.capture().map_or(0, role_rank);
    let promotion = mv.promotion().map_or(0, role_rank);
    (victim << 4) - role_rank(mv.role()) + (promotion << 4)
}

/// Yields moves highest key first via selection sort.
///
/// Keys are computed once when the picker is built; the order is only
/// resolved as moves are pulled, so a cutoff skips the remaining sort work.
#[derive(Debug)]
pub struct MovePicker {
    entries: Vec<(Move, i64)>,
    cursor: usize,
}

impl MovePicker {
    /// Main-search picker: PV move first, TT hint second, then tiers.
    pub fn new(game: &Game, moves: MoveList, pv_move: Option<Move>, tt_move: Option<Move>) -> Self {
        let entries = moves
            .into_iter()
            .map(|mv| (mv, search_key(game, mv, pv_move, tt_move)))
            .collect();
        Self { entries, cursor: 0 }
    }

    /// Quiescence picker. `hint` is the cached best move, searched first.
    pub fn new_qsearch(moves: Vec<Move>, hint: Option<Move>, in_check: bool) -> Self {
        let entries = moves
            .into_iter()
            .map(|mv| {
                let key = if hint == Some(mv) {
                    i64::MAX
                } else {
                    i64::from(qsearch_key(mv, in_check))
                };
                (mv, key)
            })
            .collect();
        Self { entries, cursor: 0 }
    }

    /// Generation order, no keys.
    pub fn unordered(moves: impl IntoIterator<Item = Move>) -> Self {
        let entries = moves.into_iter().map(|mv| (mv, 0)).collect();
        Self { entries, cursor: 0 }
    }

    /// Next highest-keyed move, or `None` when exhausted.
    pub fn pick_next(&mut self) -> Option<Move> {
        if self.cursor >= self.entries.len() {
            return None;
        }

        let mut best_idx = self.cursor;
        let mut best_key = self.entries[self.cursor].1;
        for i in (self.cursor + 1)..self.entries.len() {
            if self.entries[i].1 > best_key {
                best_key = self.entries[i].1;
                best_idx = i;
            }
        }

        self.entries.swap(self.cursor, best_idx);
        let mv = self.entries[self.cursor].0;
        self.cursor += 1;
        Some(mv)
    }

}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        self.pick_next()
    }
}
