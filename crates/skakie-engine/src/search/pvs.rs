//! Principal variation search.

use shakmaty::Move;

use crate::config::SearchConfig;
use crate::eval::Evaluator;
use crate::game::Game;
use crate::search::ordering::MovePicker;
use crate::search::pv::PvTable;
use crate::search::qsearch::qsearch;
use crate::search::repetition::RepetitionGuard;
use crate::search::stats::SearchStats;
use crate::search::tt::{QuiescenceTable, TranspositionTable};
use crate::search::{CHECKMATE, DRAW, INFINITY};

/// Everything a search depth threads through the recursion except the game.
pub(crate) struct SearchContext<'a, E: Evaluator> {
    pub config: &'a SearchConfig,
    pub evaluator: &'a E,
    pub tt: &'a mut TranspositionTable,
    pub qtt: &'a mut QuiescenceTable,
    pub repetition: RepetitionGuard<'a>,
    pub pv: PvTable,
    pub stats: SearchStats,
}

/// Negamax PVS. Returns a fail-soft score for the side to move.
///
/// `pv_hint` is the previous depth's line from this node, if this node is
/// on it. The root is `ply == 0` and is exempt from repetition checks.
pub(crate) fn pvs<E: Evaluator>(
    game: &mut Game,
    ctx: &mut SearchContext<'_, E>,
    pv_hint: &[Move],
    ply: usize,
    depth: u32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    ctx.pv.clear_ply(ply);
    ctx.stats.record_node(ply);

    let moves = game.legal_moves();
    if moves.is_empty() {
        return if game.is_check() {
            ctx.stats.mate_nodes += 1;
            -(CHECKMATE - ply as i32)
        } else {
            ctx.stats.draw_nodes += 1;
            DRAW
        };
    }

    let key = game.key();
    let is_root = ply == 0;
    if !is_root && ctx.repetition.is_repeat(key) {
        ctx.stats.draw_nodes += 1;
        return DRAW;
    }

    if depth == 0 {
        ctx.stats.leaf_nodes += 1;
        let static_value = ctx.evaluator.evaluate_relative(game);
        return qsearch(game, ctx, 0, static_value, alpha, beta);
    }

    if !is_root {
        ctx.repetition.enter(key);
    }

    let pv_move = pv_hint.first().copied();
    let picker = if ctx.config.sort_moves {
        let tt_move = ctx.tt.probe(key);
        MovePicker::new(game, moves, pv_move, tt_move)
    } else {
        MovePicker::unordered(moves)
    };

    let original_alpha = alpha;
    let mut best_score = -INFINITY;
    let mut best_move = None;
    let mut failed_high = false;

    for (index, mv) in picker.enumerate() {
        let child_hint: &[Move] = if pv_move == Some(mv) { &pv_hint[1..] } else { &[] };

        let score = {
            let mut child = game.make(mv);
            if index == 0 || depth <= 2 {
                -pvs(&mut child, ctx, child_hint, ply + 1, depth - 1, -beta, -alpha)
            } else {
                let probe = -pvs(&mut child, ctx, child_hint, ply + 1, depth - 1, -alpha - 1, -alpha);
                if probe > alpha && probe < beta {
                    ctx.stats.researches += 1;
                    -pvs(&mut child, ctx, child_hint, ply + 1, depth - 1, -beta, -alpha)
                } else {
                    probe
                }
            }
        };

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        if score > alpha {
            alpha = score;
            ctx.pv.update(ply, mv);
        }
        if alpha >= beta {
            failed_high = true;
            break;
        }
    }

    if !is_root {
        ctx.repetition.leave(key);
    }

    let improved = best_score > original_alpha;
    if failed_high {
        ctx.stats.cut_nodes += 1;
    } else if improved {
        ctx.stats.pv_nodes += 1;
    } else {
        ctx.stats.all_nodes += 1;
    }

    if !is_root
        && (failed_high || improved)
        && let Some(mv) = best_move
    {
        ctx.tt.store(key, mv);
    }

    best_score
}
