//! Command parsing.

use std::time::Duration;

use skakie_engine::SearchConfig;

use crate::error::PlayError;

/// A runtime change to the search configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SetOption {
    /// `set depth <n>`
    Depth(u32),
    /// `set qdepth <n>`
    QsearchPly(usize),
    /// `set sort on|off`
    Sort(bool),
    /// `set qsort on|off`
    QsearchSort(bool),
    /// `set qtt on|off`
    QuiescenceTable(bool),
    /// `set time <seconds>`, zero for no limit
    Time(Duration),
}

impl SetOption {
    /// `config` with this option applied.
    pub fn apply(&self, config: SearchConfig) -> SearchConfig {
        match *self {
            SetOption::Depth(depth) => config.with_depth(depth),
            SetOption::QsearchPly(ply) => config.with_qsearch_ply(ply),
            SetOption::Sort(on) => SearchConfig {
                sort_moves: on,
                ..config
            },
            SetOption::QsearchSort(on) => SearchConfig {
                sort_qsearch_moves: on,
                ..config
            },
            SetOption::QuiescenceTable(on) => SearchConfig {
                use_quiescence_table: on,
                ..config
            },
            SetOption::Time(budget) => config.with_time_budget(budget),
        }
    }
}

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A move in SAN, e.g. `Nf3` or `exd5`.
    Move(String),
    /// `pass` -- let the opponent move again.
    Pass,
    /// `engine` -- search and play the engine's move.
    Engine,
    /// `go` -- search and report without playing.
    Go,
    /// `eval` -- print the static evaluation.
    Eval,
    /// `moves` -- list legal moves.
    Moves,
    /// `board` -- print the board.
    Board,
    /// `fen <fen>` -- set up a position.
    Fen(String),
    /// `new` -- back to the starting position.
    New,
    /// `set <option> <value>` -- change a search setting.
    Set(SetOption),
    /// `show` -- print the search settings.
    Show,
    /// `help` -- list commands.
    Help,
    /// `quit` -- leave the game.
    Quit,
    /// Blank line.
    Empty,
}

/// Parse a single line of input into a [`Command`].
///
/// Anything that is not a keyword is taken to be a SAN move and checked
/// for legality when it is played.
pub fn parse_command(line: &str) -> Result<Command, PlayError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Ok(Command::Empty);
    };

    match first {
        "quit" | "exit" => Ok(Command::Quit),
        "help" | "?" => Ok(Command::Help),
        "pass" => Ok(Command::Pass),
        "engine" => Ok(Command::Engine),
        "go" => Ok(Command::Go),
        "eval" => Ok(Command::Eval),
        "moves" => Ok(Command::Moves),
        "board" => Ok(Command::Board),
        "new" => Ok(Command::New),
        "show" => Ok(Command::Show),
        "fen" => parse_fen(&tokens[1..]),
        "set" => parse_set(&tokens[1..]),
        san => Ok(Command::Move(san.to_string())),
    }
}

fn parse_fen(tokens: &[&str]) -> Result<Command, PlayError> {
    if tokens.is_empty() {
        return Err(PlayError::MissingValue {
            param: "fen".to_string(),
        });
    }
    Ok(Command::Fen(tokens.join(" ")))
}

/// Parse `set <option> <value>`.
fn parse_set(tokens: &[&str]) -> Result<Command, PlayError> {
    let Some(&name) = tokens.first() else {
        return Err(PlayError::MissingValue {
            param: "set".to_string(),
        });
    };
    let value = tokens.get(1);

    let option = match name {
        "depth" => SetOption::Depth(parse_int(value, name)?),
        "qdepth" => SetOption::QsearchPly(parse_int(value, name)?),
        "sort" => SetOption::Sort(parse_switch(value, name)?),
        "qsort" => SetOption::QsearchSort(parse_switch(value, name)?),
        "qtt" => SetOption::QuiescenceTable(parse_switch(value, name)?),
        "time" => SetOption::Time(parse_seconds(value, name)?),
        _ => {
            return Err(PlayError::UnknownOption {
                name: name.to_string(),
            });
        }
    };
    Ok(Command::Set(option))
}

fn require<'a>(token: Option<&&'a str>, param: &str) -> Result<&'a str, PlayError> {
    token.copied().ok_or_else(|| PlayError::MissingValue {
        param: param.to_string(),
    })
}

fn invalid(param: &str, value: &str) -> PlayError {
    PlayError::InvalidValue {
        param: param.to_string(),
        value: value.to_string(),
    }
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, PlayError> {
    let value = require(token, param)?;
    value.parse().map_err(|_| invalid(param, value))
}

fn parse_switch(token: Option<&&str>, param: &str) -> Result<bool, PlayError> {
    let value = require(token, param)?;
    match value {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(invalid(param, value)),
    }
}

fn parse_seconds(token: Option<&&str>, param: &str) -> Result<Duration, PlayError> {
    let value = require(token, param)?;
    let seconds: f64 = value.parse().map_err(|_| invalid(param, value))?;
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid(param, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit() {
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(parse_command("pass").unwrap(), Command::Pass);
        assert_eq!(parse_command("engine").unwrap(), Command::Engine);
        assert_eq!(parse_command("go").unwrap(), Command::Go);
        assert_eq!(parse_command("  board  ").unwrap(), Command::Board);
    }

    #[test]
    fn parse_san_move() {
        assert_eq!(
            parse_command("Nf3").unwrap(),
            Command::Move("Nf3".to_string())
        );
    }

    #[test]
    fn parse_empty_line() {
        assert_eq!(parse_command("").unwrap(), Command::Empty);
        assert_eq!(parse_command("   ").unwrap(), Command::Empty);
    }

    #[test]
    fn parse_fen_joins_fields() {
        let cmd = parse_command("fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(cmd, Command::Fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()));
    }

    #[test]
    fn parse_fen_missing() {
        assert!(matches!(
            parse_command("fen"),
            Err(PlayError::MissingValue { .. })
        ));
    }

    #[test]
    fn parse_set_depth() {
        assert_eq!(
            parse_command("set depth 6").unwrap(),
            Command::Set(SetOption::Depth(6))
        );
    }

    #[test]
    fn parse_set_switches() {
        assert_eq!(
            parse_command("set qtt off").unwrap(),
            Command::Set(SetOption::QuiescenceTable(false))
        );
        assert_eq!(
            parse_command("set sort on").unwrap(),
            Command::Set(SetOption::Sort(true))
        );
    }

    #[test]
    fn parse_set_time() {
        assert_eq!(
            parse_command("set time 1.5").unwrap(),
            Command::Set(SetOption::Time(Duration::from_millis(1500)))
        );
    }

    #[test]
    fn parse_set_negative_time_rejected() {
        assert!(matches!(
            parse_command("set time -1"),
            Err(PlayError::InvalidValue { .. })
        ));
    }

    #[test]
    fn parse_set_invalid_depth() {
        assert!(matches!(
            parse_command("set depth abc"),
            Err(PlayError::InvalidValue { .. })
        ));
    }

    #[test]
    fn parse_set_missing_value() {
        assert!(matches!(
            parse_command("set qdepth"),
            Err(PlayError::MissingValue { .. })
        ));
    }

    #[test]
    fn parse_set_unknown_option() {
        assert!(matches!(
            parse_command("set hash 16"),
            Err(PlayError::UnknownOption { .. })
        ));
    }

    #[test]
    fn apply_changes_only_named_field() {
        let base = SearchConfig::default();
        let changed = SetOption::QsearchSort(false).apply(base.clone());
        assert!(!changed.sort_qsearch_moves);
        assert_eq!(changed.max_depth, base.max_depth);
        assert_eq!(changed.use_quiescence_table, base.use_quiescence_table);
    }
}
