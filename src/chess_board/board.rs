use std::fmt;
use std::ops::{Index, IndexMut};

use super::{ChessField, Color, Piece, PieceType, Square};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// The 8x8 grid. `squares[0]` is rank 8, `squares[7]` is rank 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    pub squares: [[Square; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
        }
    }

    pub fn starting() -> Self {
        let mut board = Self::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            board.squares[0][col] = Square::Occupied(Piece::new(Color::Black, kind));
            board.squares[1][col] = Square::Occupied(Piece::new(Color::Black, PieceType::Pawn));
            board.squares[6][col] = Square::Occupied(Piece::new(Color::White, PieceType::Pawn));
            board.squares[7][col] = Square::Occupied(Piece::new(Color::White, kind));
        }
        board
    }

    /// Iterates over all occupied squares, row by row from rank 8.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (ChessField, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, squares)| {
            squares.iter().enumerate().filter_map(move |(col, square)| {
                square.piece().map(|piece| (ChessField::new(row as u8, col as u8), piece))
            })
        })
    }

    pub fn find_pieces(&self, piece: Piece) -> Vec<ChessField> {
        self.pieces_with_coordinates()
            .filter(|(_, p)| *p == piece)
            .map(|(field, _)| field)
            .collect()
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for (row, squares) in self.squares.iter().enumerate() {
            let rank = 8 - row;
            board_representation.push_str(&format!("{} │", rank));
            for square in squares {
                let c = square.piece().map_or(' ', |piece| piece.to_char());
                board_representation.push_str(&format!(" {} │", c));
            }
            board_representation.push_str(&format!(" {}\n", rank));

            if row < 7 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<ChessField> for Board {
    type Output = Square;

    fn index(&self, field: ChessField) -> &Square {
        &self.squares[field.row as usize][field.col as usize]
    }
}

impl IndexMut<ChessField> for Board {
    fn index_mut(&mut self, field: ChessField) -> &mut Square {
        &mut self.squares[field.row as usize][field.col as usize]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_to_string())
    }
}
