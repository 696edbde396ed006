//! Unpruned reference searches with static leaves.
//!
//! Same terminal and repetition rules as [`pvs`](super::pvs), no ordering,
//! no caches, no quiescence. Used to check that pruning never changes the
//! root value.

use crate::eval::Evaluator;
use crate::game::Game;
use crate::search::repetition::{GameHistory, RepetitionGuard};
use crate::search::{CHECKMATE, DRAW, INFINITY};

/// Full-width negamax to `depth`.
pub fn minimax<E: Evaluator>(game: &mut Game, evaluator: &E, history: &GameHistory, depth: u32) -> i32 {
    let mut guard = RepetitionGuard::new(history);
    minimax_node(game, evaluator, &mut guard, 0, depth)
}

/// Fail-soft alpha-beta to `depth` with a full root window.
pub fn alpha_beta<E: Evaluator>(game: &mut Game, evaluator: &E, history: &GameHistory, depth: u32) -> i32 {
    let mut guard = RepetitionGuard::new(history);
    alpha_beta_node(game, evaluator, &mut guard, 0, depth, -INFINITY, INFINITY)
}

/// Mate, stalemate, repetition or horizon value, if this node is terminal.
fn terminal<E: Evaluator>(
    game: &Game,
    evaluator: &E,
    guard: &RepetitionGuard<'_>,
    ply: usize,
    depth: u32,
) -> Option<i32> {
    if game.legal_moves().is_empty() {
        return Some(if game.is_check() {
            -(CHECKMATE - ply as i32)
        } else {
            DRAW
        });
    }
    if ply > 0 && guard.is_repeat(game.key()) {
        return Some(DRAW);
    }
    if depth == 0 {
        return Some(evaluator.evaluate_relative(game));
    }
    None
}

fn minimax_node<E: Evaluator>(
    game: &mut Game,
    evaluator: &E,
    guard: &mut RepetitionGuard<'_>,
    ply: usize,
    depth: u32,
) -> i32 {
    if let Some(value) = terminal(game, evaluator, guard, ply, depth) {
        return value;
    }

    let key = game.key();
    if ply > 0 {
        guard.enter(key);
    }
    let mut best = -INFINITY;
    for mv in game.legal_moves() {
        let mut child = game.make(mv);
        best = best.max(-minimax_node(&mut child, evaluator, guard, ply + 1, depth - 1));
    }
    if ply > 0 {
        guard.leave(key);
    }
    best
}

fn alpha_beta_node<E: Evaluator>(
    game: &mut Game,
    evaluator: &E,
    guard: &mut RepetitionGuard<'_>,
    ply: usize,
    depth: u32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    if let Some(value) = terminal(game, evaluator, guard, ply, depth) {
        return value;
    }

    let key = game.key();
    if ply > 0 {
        guard.enter(key);
    }
    let mut best = -INFINITY;
    for mv in game.legal_moves() {
        let score = {
            let mut child = game.make(mv);
            -alpha_beta_node(&mut child, evaluator, guard, ply + 1, depth - 1, -beta, -alpha)
        };
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    if ply > 0 {
        guard.leave(key);
    }
    best
}
