//! Game loop errors.

use skakie_engine::EngineError;

/// Errors that can occur while reading and executing game commands.
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    /// `set` named an option that does not exist.
    #[error("unknown option: {name}")]
    UnknownOption {
        /// The option name as entered.
        name: String,
    },

    /// A command or option needs a value that was not given.
    #[error("missing value for {param}")]
    MissingValue {
        /// The command or option missing its value.
        param: String,
    },

    /// A value could not be parsed for its command or option.
    #[error("invalid value for {param}: {value}")]
    InvalidValue {
        /// The command or option being set.
        param: String,
        /// The text that failed to parse.
        value: String,
    },

    /// The engine rejected a move, position or configuration.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Reading commands or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
