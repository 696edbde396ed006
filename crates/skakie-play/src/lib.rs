//! Interactive play against the skakie engine.

pub mod command;
pub mod error;
pub mod session;

pub use command::{Command, SetOption, parse_command};
pub use error::PlayError;
pub use session::{Flow, Session, game_result};
