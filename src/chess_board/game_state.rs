use tracing::{debug, trace};

use super::error::ChessError;
use super::zobrist_hash::ZOBRIST;
use super::{fen, Board, CastleRights, ChessField, Color, Move, PieceType, Position};

/// Authoritative game: the current position, the move log and the per-move
/// history needed to take moves back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    position: Position,
    move_log: Vec<Move>,
    // both logs hold one entry per applied move on top of the initial value
    castle_rights_log: Vec<CastleRights>,
    en_passant_log: Vec<Option<ChessField>>,
    pub checkmate: bool,
    pub stalemate: bool,
    initial_halfmove_clock: u32,
    initial_fullmove_number: u32,
}

impl GameState {
    /// A game in the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::starting(), 0, 1)
    }

    pub fn from_position(position: Position, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Self {
            position,
            move_log: Vec::new(),
            castle_rights_log: vec![position.castling_rights],
            en_passant_log: vec![position.en_passant],
            checkmate: false,
            stalemate: false,
            initial_halfmove_clock: halfmove_clock,
            initial_fullmove_number: fullmove_number,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        fen::from_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        fen::to_fen(self)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &Board {
        &self.position.board
    }

    pub fn active_color(&self) -> Color {
        self.position.active_color
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    pub fn castle_rights_log(&self) -> &[CastleRights] {
        &self.castle_rights_log
    }

    pub fn king_location(&self, color: Color) -> ChessField {
        self.position.king_location(color)
    }

    pub fn en_passant(&self) -> Option<ChessField> {
        self.position.en_passant
    }

    pub fn castling_rights(&self) -> CastleRights {
        self.position.castling_rights
    }

    pub fn hash(&self) -> u64 {
        ZOBRIST.calculate_hash(&self.position)
    }

    /// Plies since the last pawn move or capture.
    pub fn halfmove_clock(&self) -> u32 {
        match self
            .move_log
            .iter()
            .rev()
            .position(|mv| mv.is_capture() || mv.moved_kind() == Some(PieceType::Pawn))
        {
            Some(plies) => plies as u32,
            None => self.initial_halfmove_clock.saturating_add(self.move_log.len() as u32),
        }
    }

    pub fn fullmove_number(&self) -> u32 {
        let plies = self.move_log.len() as u32;
        let started_with_black = if plies % 2 == 0 {
            self.active_color() == Color::Black
        } else {
            self.active_color() == Color::White
        };
        self.initial_fullmove_number.saturating_add((plies + started_with_black as u32) / 2)
    }

    /// Applies `mv` without checking it. Callers pass moves taken from
    /// `get_valid_moves`; use `try_make_move` for untrusted input.
    pub fn make_move(&mut self, mv: Move) {
        self.position.apply(&mv);
        self.move_log.push(mv);
        self.castle_rights_log.push(self.position.castling_rights);
        self.en_passant_log.push(self.position.en_passant);
    }

    /// Takes back the last move and returns it. Does nothing on an empty log.
    pub fn undo_move(&mut self) -> Option<Move> {
        let Some(mv) = self.move_log.pop() else {
            trace!("undo requested on an empty move log");
            return None;
        };
        self.castle_rights_log.pop();
        self.en_passant_log.pop();

        let castling_rights = self.castle_rights_log.last().copied().unwrap_or_default();
        let en_passant = self.en_passant_log.last().copied().flatten();
        self.position.retract(&mv, castling_rights, en_passant);
        Some(mv)
    }

    /// Applies `mv` only if it matches (by its two squares) a legal move. The
    /// generated move is the one applied, so flags set during generation
    /// (castling, en passant) win over whatever the caller built.
    pub fn try_make_move(&mut self, mv: Move) -> Result<Move, ChessError> {
        match self.get_valid_moves().into_iter().find(|valid| *valid == mv) {
            Some(valid) => {
                self.make_move(valid);
                Ok(valid)
            }
            None => {
                debug!(mv = %mv, fen = %self.to_fen(), "rejected move that is not legal here");
                Err(ChessError::IllegalMove(mv.as_algebraic()))
            }
        }
    }

    /// `try_make_move` for coordinate text such as `e2e4`.
    pub fn make_move_from_algebraic(&mut self, text: &str) -> Result<Move, ChessError> {
        let (from, to) = Move::parse_coordinates(text)?;
        let mv = Move::new(from, to, self.board());
        self.try_make_move(mv)
    }

    /// Legal moves for the side to move, in generation order. Refreshes
    /// `checkmate` and `stalemate`.
    pub fn get_valid_moves(&mut self) -> Vec<Move> {
        let mut moves = self.position.generate_pseudo_moves();
        self.position.generate_castle_moves(&mut moves);

        // each candidate is simulated on a copy, the live position never changes
        let position = self.position;
        moves.retain(|mv| position.is_legal(mv));

        if moves.is_empty() {
            let in_check = self.in_check();
            self.checkmate = in_check;
            self.stalemate = !in_check;
            debug!(
                checkmate = self.checkmate,
                stalemate = self.stalemate,
                side = %self.active_color(),
                "no legal moves"
            );
        } else {
            self.checkmate = false;
            self.stalemate = false;
        }

        moves
    }

    pub fn in_check(&self) -> bool {
        self.position.in_check()
    }

    /// Whether the side not to move attacks `(row, col)`. Pawns attack their
    /// two forward diagonals only, so a square a pawn could merely push to is
    /// not reported.
    pub fn square_under_attack(&self, row: u8, col: u8) -> bool {
        self.position.square_under_attack(row, col)
    }

    pub fn is_game_over(&self) -> bool {
        self.checkmate || self.stalemate
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
