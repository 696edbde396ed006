//! Line-oriented game loop.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use skakie_engine::{Color, DepthReport, Engine, Game, SearchConfig, SearchOutcome};

use crate::command::{Command, parse_command};
use crate::error::PlayError;

const HELP: &str = "\
commands:
  <san>                 play a move, e.g. e4, Nf3, exd5, O-O
  pass                  let the other side move (not while in check)
  engine                let the engine choose and play a move
  go                    show the engine's choice without playing it
  eval                  static evaluation, positive = White better
  moves                 list legal moves
  board                 print the board
  fen <fen>             set up a position
  new                   back to the starting position
  set <option> <value>  depth, qdepth, sort, qsort, qtt, time (seconds)
  show                  print the search settings
  quit                  leave";

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One game against the engine, writing everything to `out`.
pub struct Session<W: Write> {
    engine: Engine,
    out: W,
    played: Vec<String>,
    auto_reply: bool,
}

impl<W: Write> Session<W> {
    /// Session at the starting position.
    pub fn new(config: SearchConfig, out: W) -> Result<Self, PlayError> {
        Ok(Self {
            engine: Engine::new(config)?,
            out,
            played: Vec::new(),
            auto_reply: false,
        })
    }

    /// Have the engine answer every move entered at the prompt.
    pub fn with_auto_reply(mut self, auto_reply: bool) -> Self {
        self.auto_reply = auto_reply;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Moves played so far, in SAN.
    pub fn played(&self) -> &[String] {
        &self.played
    }

    /// Consume the session and return the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Bad commands and illegal moves are reported and the loop continues;
    /// only I/O failures end it early.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), PlayError> {
        writeln!(self.out, "skakie - type 'help' for commands")?;
        self.print_position()?;
        self.prompt()?;

        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            debug!(cmd = %trimmed, "received command");

            let flow = match parse_command(trimmed).and_then(|cmd| self.execute(cmd)) {
                Ok(flow) => flow,
                Err(PlayError::Io { source }) => return Err(PlayError::Io { source }),
                Err(err) => {
                    warn!(error = %err, "command rejected");
                    writeln!(self.out, ">>> {err} <<<")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            self.prompt()?;
        }

        info!(moves = self.played.len(), "session finished");
        Ok(())
    }

    /// Run a single command.
    pub fn execute(&mut self, command: Command) -> Result<Flow, PlayError> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Move(san) => self.handle_move(&san)?,
            Command::Pass => self.handle_pass()?,
            Command::Engine => self.handle_engine()?,
            Command::Go => {
                self.think()?;
            }
            Command::Eval => writeln!(
                self.out,
                "static eval - positive is White advantage: {}",
                self.engine.static_evaluation()
            )?,
            Command::Moves => self.print_moves()?,
            Command::Board => self.print_position()?,
            Command::Fen(fen) => {
                let game = Game::from_fen(&fen)?;
                self.reset(game)?;
            }
            Command::New => self.reset(Game::new())?,
            Command::Set(option) => {
                let config = option.apply(self.engine.config().clone());
                self.engine.set_config(config)?;
                self.print_config()?;
            }
            Command::Show => self.print_config()?,
        }
        Ok(Flow::Continue)
    }

    fn handle_move(&mut self, san: &str) -> Result<(), PlayError> {
        let before = self.engine.game().clone();
        let mv = self.engine.apply_san(san)?;
        self.played.push(before.san(mv));
        self.print_position()?;
        if self.auto_reply && !self.engine.game().is_game_over() {
            self.handle_engine()?;
        }
        Ok(())
    }

    fn handle_pass(&mut self) -> Result<(), PlayError> {
        self.engine.pass()?;
        self.played.push("--".to_string());
        self.print_position()
    }

    fn handle_engine(&mut self) -> Result<(), PlayError> {
        let before = self.engine.game().clone();
        let outcome = self.think()?;
        let Some(mv) = outcome.best_move else {
            return Ok(());
        };
        self.engine.apply_move(mv)?;
        let san = before.san(mv);
        writeln!(
            self.out,
            "skakie plays {san} (depth {}, eval {} cp)",
            outcome.depth, outcome.score
        )?;
        self.played.push(san);
        self.print_position()
    }

    /// Search the current position, printing one line per completed depth.
    fn think(&mut self) -> Result<SearchOutcome, PlayError> {
        writeln!(self.out, "calculating...")?;
        let game = self.engine.game().clone();
        let out = &mut self.out;
        let mut written: std::io::Result<()> = Ok(());

        let outcome = self.engine.generate_move_with(|report: &DepthReport<'_>| {
            if written.is_err() {
                return;
            }
            let line = game.line_to_san(report.pv).join(" ");
            written = writeln!(
                out,
                "    depth {} eval {} cp pv {} ({} ms)",
                report.depth,
                report.score,
                line,
                report.elapsed.as_millis()
            )
            .and_then(|()| writeln!(out, "{}", indent(&report.stats.to_string())));
        });
        written?;

        match outcome.best_move {
            Some(mv) => writeln!(self.out, "best move {}", game.san(mv))?,
            None => writeln!(self.out, "no legal moves")?,
        }
        Ok(outcome)
    }

    fn reset(&mut self, game: Game) -> Result<(), PlayError> {
        self.engine.set_game(game);
        self.played.clear();
        self.print_position()
    }

    fn print_moves(&mut self) -> Result<(), PlayError> {
        let game = self.engine.game();
        let sans: Vec<String> = game.legal_moves().into_iter().map(|mv| game.san(mv)).collect();
        writeln!(self.out, "legal moves: {}", sans.join(" "))?;
        Ok(())
    }

    fn print_config(&mut self) -> Result<(), PlayError> {
        let config = self.engine.config();
        writeln!(
            self.out,
            "depth {} qdepth {} sort {} qsort {} qtt {} time {:.3}s",
            config.max_depth,
            config.max_qsearch_ply,
            on_off(config.sort_moves),
            on_off(config.sort_qsearch_moves),
            on_off(config.use_quiescence_table),
            config.time_budget.as_secs_f64()
        )?;
        Ok(())
    }

    fn print_position(&mut self) -> Result<(), PlayError> {
        let game = self.engine.game();
        writeln!(self.out)?;
        writeln!(self.out, "{game}")?;
        writeln!(self.out)?;

        if let Some(result) = game_result(game) {
            writeln!(self.out, "game over: {result}")?;
            writeln!(self.out, "moves: {}", self.played.join(" "))?;
            return Ok(());
        }

        let side = match game.side_to_move() {
            Color::White => "White",
            Color::Black => "Black",
        };
        let check = if game.is_check() { " (in check)" } else { "" };
        writeln!(self.out, "{side} to move{check}")?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<(), PlayError> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }
}

/// `1-0`, `0-1` or `1/2-1/2` once the game has ended.
pub fn game_result(game: &Game) -> Option<&'static str> {
    if game.is_checkmate() {
        Some(match game.side_to_move() {
            Color::White => "0-1",
            Color::Black => "1-0",
        })
    } else if game.is_stalemate() || game.is_insufficient_material() {
        Some("1/2-1/2")
    } else {
        None
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("        {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<Vec<u8>> {
        Session::new(SearchConfig::default().with_depth(1), Vec::new()).unwrap()
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn result_of_checkmate() {
        let game = Game::from_fen("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game_result(&game), Some("1-0"));
    }

    #[test]
    fn result_of_stalemate() {
        let game = Game::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(game_result(&game), Some("1/2-1/2"));
    }

    #[test]
    fn result_of_running_game() {
        assert_eq!(game_result(&Game::new()), None);
    }

    #[test]
    fn move_is_recorded() {
        let mut session = session();
        session.execute(Command::Move("e4".to_string())).unwrap();
        assert_eq!(session.played(), ["e4"]);
        assert_eq!(session.engine().game().side_to_move(), Color::Black);
    }

    #[test]
    fn illegal_move_is_an_error() {
        let mut session = session();
        assert!(session.execute(Command::Move("Qh5".to_string())).is_err());
        assert!(session.played().is_empty());
    }

    #[test]
    fn engine_plays_a_move() {
        let mut session = session();
        session.execute(Command::Engine).unwrap();
        assert_eq!(session.played().len(), 1);
        assert_eq!(session.engine().game().ply(), 1);
        let text = output(session);
        assert!(text.contains("skakie plays"));
        assert!(text.contains("depth 1"));
    }

    #[test]
    fn go_does_not_play() {
        let mut session = session();
        session.execute(Command::Go).unwrap();
        assert_eq!(session.engine().game().ply(), 0);
        assert!(output(session).contains("best move"));
    }

    #[test]
    fn auto_reply_answers() {
        let mut session = session().with_auto_reply(true);
        session.execute(Command::Move("e4".to_string())).unwrap();
        assert_eq!(session.played().len(), 2);
        assert_eq!(session.engine().game().side_to_move(), Color::White);
    }

    #[test]
    fn set_rebuilds_config() {
        let mut session = session();
        session
            .execute(Command::Set(crate::SetOption::Depth(3)))
            .unwrap();
        assert_eq!(session.engine().config().max_depth, 3);
    }

    #[test]
    fn set_invalid_depth_rejected() {
        let mut session = session();
        assert!(session
            .execute(Command::Set(crate::SetOption::Depth(0)))
            .is_err());
        assert_eq!(session.engine().config().max_depth, 1);
    }

    #[test]
    fn fen_resets_played_moves() {
        let mut session = session();
        session.execute(Command::Move("d4".to_string())).unwrap();
        session
            .execute(Command::Fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()))
            .unwrap();
        assert!(session.played().is_empty());
        assert_eq!(session.engine().game().legal_moves().len(), 5);
    }
}
