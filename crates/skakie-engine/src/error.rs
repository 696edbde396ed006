//! Engine errors.

use crate::config::ConfigError;

/// Errors raised when feeding moves or positions into the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A FEN string could not be parsed or describes an impossible position.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that was rejected.
        fen: String,
    },

    /// A SAN string could not be parsed or is not legal in the current position.
    #[error("illegal move: {san}")]
    IllegalMove {
        /// The move text as entered.
        san: String,
    },

    /// A move value that is not among the legal moves of the current position.
    #[error("move {uci} is not legal in this position")]
    NotLegal {
        /// The move in UCI notation.
        uci: String,
    },

    /// Passing is only allowed when the side to move is not in check.
    #[error("cannot pass while in check")]
    PassInCheck,

    /// The rules engine refused the null move.
    #[error("pass rejected: {reason}")]
    PassRejected {
        /// Why the resulting position was invalid.
        reason: String,
    },

    /// The search configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
