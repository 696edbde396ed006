//! Game state with push/unmove on top of the `shakmaty` rules engine.

use std::fmt;
use std::ops::{Deref, DerefMut};

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::zobrist::Zobrist64;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, MoveList, Position, Role, Square};

use crate::error::EngineError;

/// Hash of everything that decides a repetition: placement, side to move,
/// castling rights and a legal en-passant square. Move clocks are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(pub u64);

impl PositionKey {
    /// Key of an arbitrary position.
    pub fn of(position: &Chess) -> Self {
        Self(position.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0)
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Current position plus an undo stack.
///
/// The search owns a `Game` exclusively and walks the tree with
/// [`make`](Game::make), whose guard restores the parent on drop.
#[derive(Debug, Clone)]
pub struct Game {
    position: Chess,
    key: PositionKey,
    undo: Vec<(Chess, PositionKey)>,
}

impl Game {
    /// Standard starting position.
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    /// Wrap an existing position with an empty undo stack.
    pub fn from_position(position: Chess) -> Self {
        let key = PositionKey::of(&position);
        Self {
            position,
            key,
            undo: Vec::new(),
        }
    }

    /// Parse a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidFen {
            fen: fen.to_string(),
        };
        let parsed: Fen = fen.trim().parse().map_err(|_| invalid())?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| invalid())?;
        Ok(Self::from_position(position))
    }

    /// The underlying rules-engine position.
    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Key of the current position.
    pub fn key(&self) -> PositionKey {
        self.key
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.turn()
    }

    /// Number of plies pushed since this game was created or reset.
    pub fn ply(&self) -> usize {
        self.undo.len()
    }

    pub fn legal_moves(&self) -> MoveList {
        self.position.legal_moves()
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    /// Checkmate, stalemate or a dead position.
    pub fn is_game_over(&self) -> bool {
        self.legal_moves().is_empty() || self.is_insufficient_material()
    }

    pub fn role_at(&self, square: Square) -> Option<Role> {
        self.position.board().role_at(square)
    }

    /// Whether any piece of `by` attacks `square` in the current placement.
    pub fn is_attacked_by(&self, by: Color, square: Square) -> bool {
        let board = self.position.board();
        self.position
            .king_attackers(square, by, board.occupied())
            .any()
    }

    /// Play a legal move. The caller guarantees legality.
    pub fn push(&mut self, mv: Move) {
        self.undo.push((self.position.clone(), self.key));
        self.position.play_unchecked(mv);
        self.key = PositionKey::of(&self.position);
    }

    /// Hand the move to the opponent without moving a piece.
    pub fn push_null(&mut self) -> Result<(), EngineError> {
        if self.is_check() {
            return Err(EngineError::PassInCheck);
        }
        let swapped = self
            .position
            .clone()
            .swap_turn()
            .map_err(|err| EngineError::PassRejected {
                reason: err.to_string(),
            })?;
        let previous = std::mem::replace(&mut self.position, swapped);
        self.undo.push((previous, self.key));
        self.key = PositionKey::of(&self.position);
        Ok(())
    }

    /// Undo the last push. Does nothing on an empty stack.
    pub fn unmove(&mut self) {
        debug_assert!(!self.undo.is_empty(), "unmove without a matching push");
        if let Some((position, key)) = self.undo.pop() {
            self.position = position;
            self.key = key;
        }
    }

    /// Push `mv` and return a guard that unmoves when dropped.
    pub fn make(&mut self, mv: Move) -> MoveGuard<'_> {
        self.push(mv);
        MoveGuard { game: self }
    }

    /// Whether `mv` takes a piece, en passant included.
    pub fn is_capture(&self, mv: Move) -> bool {
        mv.is_capture()
    }

    pub fn is_en_passant(&self, mv: Move) -> bool {
        mv.is_en_passant()
    }

    /// SAN with check/mate suffix, e.g. `Qxf7#`.
    pub fn san(&self, mv: Move) -> String {
        SanPlus::from_move(self.position.clone(), mv).to_string()
    }

    /// Parse SAN text into a legal move of the current position.
    pub fn parse_san(&self, text: &str) -> Result<Move, EngineError> {
        let illegal = || EngineError::IllegalMove {
            san: text.to_string(),
        };
        let san: SanPlus = text.trim().parse().map_err(|_| illegal())?;
        san.san.to_move(&self.position).map_err(|_| illegal())
    }

    /// Render a line of moves starting from the current position.
    pub fn line_to_san(&self, line: &[Move]) -> Vec<String> {
        let mut position = self.position.clone();
        let mut sans = Vec::with_capacity(line.len());
        for &mv in line {
            sans.push(SanPlus::from_move(position.clone(), mv).to_string());
            position.play_unchecked(mv);
        }
        sans
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.position.board();
        for rank in (0..8u32).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u32 {
                let square = Square::new(rank * 8 + file);
                let glyph = board.piece_at(square).map_or('.', |piece| piece.char());
                write!(f, " {glyph}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

/// A pushed move that is taken back when the guard goes out of scope.
pub struct MoveGuard<'a> {
    game: &'a mut Game,
}

impl Deref for MoveGuard<'_> {
    type Target = Game;

    fn deref(&self) -> &Game {
        self.game
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Game {
        self.game
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.game.unmove();
    }
}
