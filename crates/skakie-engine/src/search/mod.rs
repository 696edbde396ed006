//! Iterative deepening driver and the engine front door.

pub mod control;
pub mod ordering;
pub mod pv;
pub(crate) mod pvs;
pub(crate) mod qsearch;
pub mod reference;
pub mod repetition;
pub mod stats;
pub mod tt;

use std::time::Duration;

use shakmaty::Move;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::EngineError;
use crate::eval::{Evaluator, PieceSquareEvaluator};
use crate::game::Game;

use control::SearchClock;
use pv::PvTable;
use pvs::{SearchContext, pvs};
use repetition::{GameHistory, RepetitionGuard};
use stats::SearchStats;
use tt::{QuiescenceTable, TranspositionTable};

/// Bound no real score reaches.
pub const INFINITY: i32 = 1_000_000;

/// Score of delivering mate at the root. Mate at ply `n` scores `CHECKMATE - n`.
pub const CHECKMATE: i32 = 100_000;

/// Scores at or above this are forced mates found by the main search.
pub const MATE_THRESHOLD: i32 = CHECKMATE - 1_000;

/// Stalemate and repetition.
pub const DRAW: i32 = 0;

/// Penalty below the static value for being mated inside quiescence.
pub const Q_MATE_OFFSET: i32 = 50_000;

/// Offset from the static value for a stalemate found inside quiescence.
pub const Q_DRAW_DELTA: i32 = 0;

/// Result of one move decision.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// `None` when the side to move has no legal moves.
    pub best_move: Option<Move>,
    /// Score for the side to move at the deepest completed depth.
    pub score: i32,
    /// Principal variation, root move first.
    pub pv: Vec<Move>,
    /// Counters from the deepest completed depth.
    pub stats: SearchStats,
    /// Deepest completed depth.
    pub depth: u32,
    /// Wall time for the whole decision.
    pub elapsed: Duration,
}

impl SearchOutcome {
    /// Whether the score is a forced mate for either side.
    pub fn is_mate(&self) -> bool {
        self.score.abs() >= MATE_THRESHOLD
    }
}

/// Progress after one completed iterative-deepening depth.
#[derive(Debug)]
pub struct DepthReport<'a> {
    pub depth: u32,
    pub score: i32,
    pub pv: &'a [Move],
    pub stats: &'a SearchStats,
    pub elapsed: Duration,
}

/// Game state, caches and configuration for move decisions.
///
/// The engine owns the game it plays. Feed moves in with
/// [`apply_move`](Engine::apply_move) / [`apply_san`](Engine::apply_san) /
/// [`pass`](Engine::pass) so repetitions are tracked, and ask for a move
/// with [`generate_move`](Engine::generate_move).
pub struct Engine<E: Evaluator = PieceSquareEvaluator> {
    game: Game,
    history: GameHistory,
    config: SearchConfig,
    evaluator: E,
    tt: TranspositionTable,
    qtt: QuiescenceTable,
}

impl Engine<PieceSquareEvaluator> {
    /// Engine at the starting position with the default evaluator.
    pub fn new(config: SearchConfig) -> Result<Self, EngineError> {
        Self::with_evaluator(Game::new(), config, PieceSquareEvaluator)
    }

    /// Engine at an arbitrary FEN with the default evaluator.
    pub fn from_fen(fen: &str, config: SearchConfig) -> Result<Self, EngineError> {
        Self::with_evaluator(Game::from_fen(fen)?, config, PieceSquareEvaluator)
    }
}

impl<E: Evaluator> Engine<E> {
    /// Engine over `game` with a custom evaluator.
    pub fn with_evaluator(game: Game, config: SearchConfig, evaluator: E) -> Result<Self, EngineError> {
        config.validate()?;
        let mut history = GameHistory::new();
        history.record(game.key());
        Ok(Self {
            game,
            history,
            config,
            evaluator,
            tt: TranspositionTable::new(),
            qtt: QuiescenceTable::new(),
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replace the configuration. The game is kept.
    pub fn set_config(&mut self, config: SearchConfig) -> Result<(), EngineError> {
        config.validate()?;
        debug!(?config, "search config replaced");
        self.config = config;
        Ok(())
    }

    /// Start a new game from `game`, forgetting all history.
    pub fn set_game(&mut self, game: Game) {
        self.history.clear();
        self.history.record(game.key());
        self.game = game;
        self.tt.clear();
        self.qtt.clear();
    }

    /// Play a legal move and record the new position for repetition checks.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), EngineError> {
        if !self.game.legal_moves().contains(&mv) {
            return Err(EngineError::NotLegal {
                uci: mv.to_uci(shakmaty::CastlingMode::Standard).to_string(),
            });
        }
        self.game.push(mv);
        self.history.record(self.game.key());
        Ok(())
    }

    /// Parse and play a SAN move, returning the move played.
    pub fn apply_san(&mut self, san: &str) -> Result<Move, EngineError> {
        let mv = self.game.parse_san(san)?;
        self.apply_move(mv)?;
        Ok(mv)
    }

    /// Let the opponent move again. Illegal while in check.
    pub fn pass(&mut self) -> Result<(), EngineError> {
        self.game.push_null()?;
        self.history.record(self.game.key());
        Ok(())
    }

    /// Static evaluation of the current position, positive = White better.
    pub fn static_evaluation(&self) -> i32 {
        self.evaluator.evaluate(self.game.position())
    }

    /// Choose a move for the side to move.
    pub fn generate_move(&mut self) -> SearchOutcome {
        self.generate_move_with(|_| {})
    }

    /// Choose a move, calling `on_depth` after every completed depth.
    ///
    /// Deepens from 1 to `max_depth`. With a time budget, stops after the
    /// first completed depth that finishes past the budget. The game is
    /// left exactly as it was.
    pub fn generate_move_with<F>(&mut self, mut on_depth: F) -> SearchOutcome
    where
        F: FnMut(&DepthReport<'_>),
    {
        self.tt.clear();
        self.qtt.clear();

        let clock = SearchClock::start(self.config.budget());
        let start_key = self.game.key();
        let start_ply = self.game.ply();

        let mut outcome = SearchOutcome {
            best_move: None,
            score: -INFINITY,
            pv: Vec::new(),
            stats: SearchStats::default(),
            depth: 0,
            elapsed: Duration::ZERO,
        };

        for depth in 1..=self.config.max_depth {
            let mut ctx = SearchContext {
                config: &self.config,
                evaluator: &self.evaluator,
                tt: &mut self.tt,
                qtt: &mut self.qtt,
                repetition: RepetitionGuard::new(&self.history),
                pv: PvTable::new(depth as usize),
                stats: SearchStats::new(depth, self.config.max_qsearch_ply),
            };

            let score = pvs(&mut self.game, &mut ctx, &outcome.pv, 0, depth, -INFINITY, INFINITY);

            debug_assert_eq!(ctx.repetition.depth(), 0, "search path not unwound");
            debug_assert_eq!(self.game.key(), start_key, "search did not restore the position");
            debug_assert_eq!(self.game.ply(), start_ply);

            outcome.pv = ctx.pv.root_pv().to_vec();
            outcome.best_move = outcome.pv.first().copied();
            outcome.score = score;
            outcome.stats = ctx.stats;
            outcome.depth = depth;
            outcome.elapsed = clock.elapsed();

            info!(
                depth,
                score,
                nodes = outcome.stats.nodes,
                qnodes = outcome.stats.qnodes,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                pv = %self.game.line_to_san(&outcome.pv).join(" "),
                "depth complete"
            );
            debug!(stats = %outcome.stats, "search counters");

            on_depth(&DepthReport {
                depth,
                score,
                pv: &outcome.pv,
                stats: &outcome.stats,
                elapsed: outcome.elapsed,
            });

            if outcome.best_move.is_none() {
                // mate or stalemate at the root: deeper searches cannot differ
                break;
            }
            if clock.should_stop_iterating() {
                debug!(depth, budget = ?clock.budget(), "time budget exhausted");
                break;
            }
        }

        outcome
    }
}

impl<E: Evaluator> std::fmt::Debug for Engine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("fen", &self.game.fen())
            .field("config", &self.config)
            .field("tt", &self.tt)
            .field("qtt", &self.qtt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(fen: &str, depth: u32) -> Engine {
        Engine::from_fen(fen, SearchConfig::default().with_depth(depth)).unwrap()
    }

    #[test]
    fn depth_1_returns_legal_move() {
        let mut engine = Engine::new(SearchConfig::default().with_depth(1)).unwrap();
        let outcome = engine.generate_move();
        let mv = outcome.best_move.expect("should find a move at depth 1");
        assert!(engine.game().legal_moves().contains(&mv));
        assert_eq!(outcome.depth, 1);
        assert_ne!(outcome.score, 0);
        assert!(!outcome.is_mate());
    }

    #[test]
    fn finds_mate_in_one() {
        for depth in 1..=3 {
            let mut engine =
                engine("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", depth);
            let outcome = engine.generate_move();
            let mv = outcome.best_move.unwrap();
            assert_eq!(engine.game().san(mv), "Qxf7#", "depth {depth}");
            assert_eq!(outcome.score, CHECKMATE - 1, "depth {depth}");
            assert!(outcome.is_mate());
        }
    }

    #[test]
    fn stalemate_is_draw() {
        let mut engine = engine("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", 3);
        let outcome = engine.generate_move();
        assert!(outcome.best_move.is_none());
        assert_eq!(outcome.score, DRAW);
    }

    #[test]
    fn mated_position_has_no_move() {
        let mut engine = engine("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1", 3);
        let outcome = engine.generate_move();
        assert!(outcome.best_move.is_none());
        assert_eq!(outcome.score, -CHECKMATE);
        assert!(outcome.is_mate());
    }

    #[test]
    fn search_leaves_game_untouched() {
        let mut engine = Engine::new(SearchConfig::default().with_depth(3)).unwrap();
        let before = engine.game().fen();
        engine.generate_move();
        assert_eq!(engine.game().fen(), before);
        assert_eq!(engine.game().ply(), 0);
    }

    #[test]
    fn reports_every_depth() {
        let mut engine = Engine::new(SearchConfig::default().with_depth(3)).unwrap();
        let mut depths = Vec::new();
        let outcome = engine.generate_move_with(|report| {
            assert!(!report.pv.is_empty());
            depths.push(report.depth);
        });
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(outcome.depth, 3);
    }

    #[test]
    fn pv_starts_with_best_move() {
        let mut engine = Engine::new(SearchConfig::default().with_depth(3)).unwrap();
        let outcome = engine.generate_move();
        assert_eq!(outcome.pv.first().copied(), outcome.best_move);
        assert!(outcome.pv.len() <= 3);
    }

    #[test]
    fn apply_records_history() {
        let mut engine = Engine::new(SearchConfig::default()).unwrap();
        assert_eq!(engine.history().len(), 1);
        engine.apply_san("e4").unwrap();
        assert_eq!(engine.history().len(), 2);
        assert!(engine.history().contains(engine.game().key()));
    }

    #[test]
    fn apply_illegal_san_fails() {
        let mut engine = Engine::new(SearchConfig::default()).unwrap();
        assert!(matches!(
            engine.apply_san("Ke2"),
            Err(EngineError::IllegalMove { .. })
        ));
        assert_eq!(engine.game().ply(), 0);
    }

    #[test]
    fn pass_in_check_fails() {
        let mut engine = Engine::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1", SearchConfig::default())
            .unwrap();
        assert!(matches!(engine.pass(), Err(EngineError::PassInCheck)));
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(matches!(
            Engine::new(SearchConfig::default().with_depth(0)),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn static_evaluation_is_white_relative() {
        let engine =
            Engine::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1", SearchConfig::default()).unwrap();
        assert!(engine.static_evaluation() > 800);
    }
}
