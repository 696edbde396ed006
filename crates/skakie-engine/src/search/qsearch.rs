//! Quiescence search.
//!
//! Resolves captures and promotions below the main-search horizon. The
//! position is evaluated once at the leaf; below that, each node's static
//! value is the parent's plus the material the move won, so no node
//! re-runs the evaluator.

use shakmaty::Move;

use crate::eval::Evaluator;
use crate::eval::material::{piece_value, promotion_gain};
use crate::game::Game;
use crate::search::ordering::MovePicker;
use crate::search::pvs::SearchContext;
use crate::search::{INFINITY, Q_DRAW_DELTA, Q_MATE_OFFSET};

/// Material the mover gains by playing `mv`. En passant captures a pawn.
pub fn material_gain(mv: Move) -> i32 {
    mv.capture().map_or(0, piece_value) + mv.promotion().map_or(0, promotion_gain)
}

/// Fail-soft quiescence search for the side to move.
///
/// `static_value` is this node's baseline from the side to move's
/// perspective. `ply` counts from the main-search leaf.
pub(crate) fn qsearch<E: Evaluator>(
    game: &mut Game,
    ctx: &mut SearchContext<'_, E>,
    ply: usize,
    static_value: i32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    ctx.stats.record_qnode(ply);

    let in_check = game.is_check();
    if !in_check {
        if static_value >= beta {
            ctx.stats.qstand_pat_nodes += 1;
            return static_value;
        }
        alpha = alpha.max(static_value);
    }

    let max_ply = ctx.config.max_qsearch_ply;
    if ply >= max_ply {
        return static_value;
    }

    let key = game.key();
    let use_table = ctx.config.use_quiescence_table;
    let mut hint = None;
    if use_table {
        let entry = *ctx.qtt.entry(key);
        let (lower, upper) = entry.bounds(static_value);
        if upper <= alpha || lower >= beta || lower == upper {
            ctx.stats.qtt_hits += 1;
            return if upper <= alpha { upper } else { lower };
        }
        hint = entry.best_move();
    }

    let moves = game.legal_moves();
    if moves.is_empty() {
        return if in_check {
            static_value - Q_MATE_OFFSET
        } else {
            static_value + Q_DRAW_DELTA
        };
    }

    let candidates: Vec<Move> = if in_check {
        moves.into_iter().collect()
    } else {
        moves
            .into_iter()
            .filter(|&mv| game.is_capture(mv) || mv.is_promotion())
            .collect()
    };
    if candidates.is_empty() {
        return static_value;
    }

    let picker = if ctx.config.sort_qsearch_moves {
        MovePicker::new_qsearch(candidates, hint, in_check)
    } else {
        MovePicker::unordered(candidates)
    };

    let entry_alpha = alpha;
    let mut best = if in_check { -INFINITY } else { static_value };
    let mut best_move = None;

    for mv in picker {
        let move_value = static_value + material_gain(mv);
        let score = if ply + 1 < max_ply {
            let mut child = game.make(mv);
            -qsearch(&mut child, ctx, ply + 1, -move_value, -beta, -alpha)
        } else {
            ctx.stats.record_qhorizon();
            move_value
        };

        if score > best {
            best = score;
            best_move = Some(mv);
        }
        if score >= beta {
            ctx.stats.qcut_nodes += 1;
            break;
        }
        alpha = alpha.max(score);
    }

    if use_table {
        let delta = best - static_value;
        let entry = ctx.qtt.entry(key);
        if best <= entry_alpha {
            entry.tighten_upper(delta);
        } else if best >= beta {
            entry.tighten_lower(delta, best_move);
        } else {
            entry.set_exact(delta, best_move);
        }
    }

    best
}
