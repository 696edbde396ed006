//! Game-tree search for skakie.
//!
//! Iterative deepening over a principal variation search, with a
//! delta-bounded quiescence search underneath. Rules come from `shakmaty`.

pub mod config;
pub mod error;
pub mod eval;
pub mod game;
pub mod search;

pub use config::{ConfigError, SearchConfig};
pub use error::EngineError;
pub use eval::{Evaluator, PieceSquareEvaluator};
pub use game::{Game, MoveGuard, PositionKey};
pub use search::stats::SearchStats;
pub use search::{CHECKMATE, DRAW, DepthReport, Engine, INFINITY, SearchOutcome};

pub use shakmaty::{Color, Move};
