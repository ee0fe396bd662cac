use std::fmt;
use std::hash::{Hash, Hasher};

use super::error::ChessError;
use super::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row step of a pawn advance. White moves towards row 0.
    pub fn forward(&self) -> isize {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row holding this color's king and rooks at the start of the game.
    pub fn back_rank(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn promotion_row(&self) -> u8 {
        self.opposite().back_rank()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub fn to_char(&self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// FEN letter: upper case for white, lower case for black.
    pub fn to_char(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'N' => PieceType::Knight,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'Q' => PieceType::Queen,
            'K' => PieceType::King,
            _ => return None,
        };
        Some(Self { color, kind })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    Occupied(Piece),
    #[default]
    Empty,
}

impl Square {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Square::Occupied(piece) => Some(*piece),
            Square::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Square::Empty)
    }

    pub fn has_color(&self, color: Color) -> bool {
        matches!(self, Square::Occupied(piece) if piece.color == color)
    }

    pub fn is(&self, color: Color, kind: PieceType) -> bool {
        *self == Square::Occupied(Piece { color, kind })
    }
}

/// A square coordinate. Row 0 is rank 8, column 0 is file a.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct ChessField {
    pub row: u8,
    pub col: u8,
}

impl ChessField {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn from_algebraic(algebraic: &str) -> Result<Self, ChessError> {
        let mut chars = algebraic.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => {
                let col = file as u8 - b'a';
                let row = b'8' - rank as u8;
                Ok(Self { row, col })
            }
            _ => Err(ChessError::InvalidSquare(algebraic.to_string())),
        }
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.row, self.col)
    }

    /// The field `(d_row, d_col)` away, or `None` when that leaves the board.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row as isize + d_row;
        let col = self.col as isize + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for ChessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

/// A single transition, snapshotting the moved and captured pieces from the
/// board it was built on. Equality only looks at the two squares.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: ChessField,
    pub to: ChessField,
    pub piece_moved: Square,
    pub piece_captured: Square,
    pub is_pawn_promotion: bool,
    pub is_en_passant_move: bool,
    pub is_castle_move: bool,
}

impl Move {
    pub fn new(from: ChessField, to: ChessField, board: &Board) -> Self {
        let piece_moved = board[from];
        let is_pawn_promotion = match piece_moved {
            Square::Occupied(Piece { color, kind: PieceType::Pawn }) => to.row == color.promotion_row(),
            _ => false,
        };
        Self {
            from,
            to,
            piece_moved,
            piece_captured: board[to],
            is_pawn_promotion,
            is_en_passant_move: false,
            is_castle_move: false,
        }
    }

    /// En passant capture. The captured piece is the opposing pawn beside the
    /// mover, not the (empty) landing square.
    pub fn en_passant(from: ChessField, to: ChessField, board: &Board) -> Self {
        let mut mv = Self::new(from, to, board);
        mv.is_en_passant_move = true;
        mv.piece_captured = match mv.piece_moved {
            Square::Occupied(piece) => Square::Occupied(Piece::new(piece.color.opposite(), PieceType::Pawn)),
            Square::Empty => Square::Empty,
        };
        mv
    }

    pub fn castle(from: ChessField, to: ChessField, board: &Board) -> Self {
        let mut mv = Self::new(from, to, board);
        mv.is_castle_move = true;
        mv
    }

    pub fn moved_kind(&self) -> Option<PieceType> {
        self.piece_moved.piece().map(|p| p.kind)
    }

    pub fn is_capture(&self) -> bool {
        !self.piece_captured.is_empty()
    }

    pub fn is_two_square_pawn_advance(&self) -> bool {
        self.moved_kind() == Some(PieceType::Pawn) && self.from.row.abs_diff(self.to.row) == 2
    }

    /// Rook origin and destination of a castle move.
    pub fn castle_rook_squares(&self) -> Option<(ChessField, ChessField)> {
        if self.to.col > self.from.col {
            Some((self.to.offset(0, 1)?, self.to.offset(0, -1)?))
        } else {
            Some((self.to.offset(0, -2)?, self.to.offset(0, 1)?))
        }
    }

    /// Minimal algebraic form for display: `e4`, `exd5`, `Nf3`, `Bxf7`.
    /// No check suffix, no disambiguation, castles read as king moves.
    pub fn get_chess_notation(&self) -> String {
        let prefix = match (self.piece_moved, self.is_capture()) {
            (Square::Occupied(Piece { kind: PieceType::Pawn, .. }), true) => {
                format!("{}x", (b'a' + self.from.col) as char)
            }
            (Square::Occupied(Piece { kind: PieceType::Pawn, .. }), false) => String::new(),
            (Square::Occupied(piece), true) => format!("{}x", piece.kind),
            (Square::Occupied(piece), false) => piece.kind.to_string(),
            (Square::Empty, _) => String::new(),
        };
        prefix + &self.to.as_algebraic()
    }

    /// Coordinate form, `e2e4`, with a trailing `q` on promotions.
    pub fn as_algebraic(&self) -> String {
        let base_move = format!("{}{}", self.from.as_algebraic(), self.to.as_algebraic());
        if self.is_pawn_promotion {
            base_move + "q"
        } else {
            base_move
        }
    }

    /// Splits coordinate text such as `e2e4` or `e7e8q` into its two fields.
    /// Only queen promotions are accepted.
    pub fn parse_coordinates(text: &str) -> Result<(ChessField, ChessField), ChessError> {
        let text = text.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(ChessError::InvalidMoveText(text.to_string()));
        }
        if let Some(promotion) = text.chars().nth(4) {
            if !promotion.eq_ignore_ascii_case(&'q') {
                return Err(ChessError::InvalidMoveText(text.to_string()));
            }
        }
        let from = ChessField::from_algebraic(&text[0..2])?;
        let to = ChessField::from_algebraic(&text[2..4])?;
        Ok((from, to))
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

pub fn to_algebraic_square(row: u8, col: u8) -> String {
    let file = (b'a' + col) as char;
    let rank = (b'8' - row) as char;
    format!("{}{}", file, rank)
}
