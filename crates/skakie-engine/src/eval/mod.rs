//! Static evaluation.
//!
//! Scores are centipawns from White's perspective. The search flips the
//! sign for Black.

pub mod material;
pub mod pst;

use shakmaty::{Chess, Color, Position};

use crate::game::Game;

/// Pure position scorer, positive when White is better.
pub trait Evaluator {
    fn evaluate(&self, position: &Chess) -> i32;

    /// Score from the side to move's perspective.
    fn evaluate_relative(&self, game: &Game) -> i32 {
        let score = self.evaluate(game.position());
        match game.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        }
    }
}

/// Material plus piece-square tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareEvaluator;

impl Evaluator for PieceSquareEvaluator {
    fn evaluate(&self, position: &Chess) -> i32 {
        let board = position.board();
        let mut score = 0;
        for sq in board.occupied() {
            if let Some(piece) = board.piece_at(sq) {
                let value = material::piece_value(piece.role);
                score += match piece.color {
                    Color::White => value,
                    Color::Black => -value,
                };
                score += pst::pst_value(piece.role, piece.color, sq);
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_fen(fen: &str) -> i32 {
        let game = Game::from_fen(fen).unwrap();
        PieceSquareEvaluator.evaluate(game.position())
    }

    #[test]
    fn start_is_balanced() {
        let game = Game::new();
        assert_eq!(PieceSquareEvaluator.evaluate(game.position()), 0);
    }

    #[test]
    fn extra_queen_is_winning() {
        let score = eval_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        assert!(score > 800, "expected large White advantage, got {score}");
    }

    #[test]
    fn mirrored_position_negates() {
        let white = eval_fen("4k3/8/8/8/8/2N5/8/4K3 w - - 0 1");
        let black = eval_fen("4k3/8/2n5/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(white, -black);
    }

    #[test]
    fn relative_flips_for_black() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        let absolute = PieceSquareEvaluator.evaluate(game.position());
        assert_eq!(PieceSquareEvaluator.evaluate_relative(&game), -absolute);
    }

    #[test]
    fn e4_gains_positional_value() {
        let mut game = Game::new();
        let mv = game.parse_san("e4").unwrap();
        game.push(mv);
        assert_eq!(PieceSquareEvaluator.evaluate(game.position()), 42);
    }
}
