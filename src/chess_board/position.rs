use super::{Board, CastleRights, ChessField, Color, Move, Piece, PieceType, Square};

/// Board plus side to move and the state derived from the move history.
/// Small and `Copy`, so legality checks simulate moves on a scratch copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub active_color: Color,
    pub white_king_location: ChessField,
    pub black_king_location: ChessField,
    pub en_passant: Option<ChessField>,
    pub castling_rights: CastleRights,
}

impl Position {
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            active_color: Color::White,
            white_king_location: ChessField::new(7, 4),
            black_king_location: ChessField::new(0, 4),
            en_passant: None,
            castling_rights: CastleRights::all(),
        }
    }

    pub fn king_location(&self, color: Color) -> ChessField {
        match color {
            Color::White => self.white_king_location,
            Color::Black => self.black_king_location,
        }
    }

    fn set_king_location(&mut self, color: Color, field: ChessField) {
        match color {
            Color::White => self.white_king_location = field,
            Color::Black => self.black_king_location = field,
        }
    }

    /// Applies `mv` without any legality check.
    pub fn apply(&mut self, mv: &Move) {
        self.board[mv.from] = Square::Empty;
        self.board[mv.to] = mv.piece_moved;
        self.active_color = self.active_color.opposite();

        if let Square::Occupied(piece) = mv.piece_moved {
            if piece.kind == PieceType::King {
                self.set_king_location(piece.color, mv.to);
            }
            if mv.is_pawn_promotion {
                self.board[mv.to] = Square::Occupied(Piece::new(piece.color, PieceType::Queen));
            }
        }

        if mv.is_en_passant_move {
            self.board[ChessField::new(mv.from.row, mv.to.col)] = Square::Empty;
        }

        self.en_passant = if mv.is_two_square_pawn_advance() {
            Some(ChessField::new((mv.from.row + mv.to.row) / 2, mv.to.col))
        } else {
            None
        };

        if mv.is_castle_move {
            if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
                self.board[rook_to] = self.board[rook_from];
                self.board[rook_from] = Square::Empty;
            }
        }

        self.update_castle_rights(mv);
    }

    /// Reverses `apply(mv)`. Rights and en passant target are not derivable
    /// from the move, so the caller passes the values logged before it.
    pub fn retract(&mut self, mv: &Move, castling_rights: CastleRights, en_passant: Option<ChessField>) {
        self.board[mv.from] = mv.piece_moved;
        self.board[mv.to] = mv.piece_captured;
        self.active_color = self.active_color.opposite();

        if let Square::Occupied(piece) = mv.piece_moved {
            if piece.kind == PieceType::King {
                self.set_king_location(piece.color, mv.from);
            }
        }

        if mv.is_en_passant_move {
            self.board[mv.to] = Square::Empty;
            self.board[ChessField::new(mv.from.row, mv.to.col)] = mv.piece_captured;
        }

        if mv.is_castle_move {
            if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
                self.board[rook_from] = self.board[rook_to];
                self.board[rook_to] = Square::Empty;
            }
        }

        self.castling_rights = castling_rights;
        self.en_passant = en_passant;
    }

    fn update_castle_rights(&mut self, mv: &Move) {
        if let Square::Occupied(piece) = mv.piece_moved {
            match piece.kind {
                PieceType::King => self.castling_rights.revoke_all(piece.color),
                PieceType::Rook => self.castling_rights.revoke_for_rook_square(piece.color, mv.from),
                _ => {}
            }
        }
        // a rook captured on its corner takes the right with it
        if let Square::Occupied(Piece { color, kind: PieceType::Rook }) = mv.piece_captured {
            self.castling_rights.revoke_for_rook_square(color, mv.to);
        }
    }

    pub fn in_check(&self) -> bool {
        let king = self.king_location(self.active_color);
        self.square_under_attack(king.row, king.col)
    }

    /// Whether `mv` keeps the mover's king safe, judged on a scratch copy.
    pub fn is_legal(&self, mv: &Move) -> bool {
        let mut scratch = *self;
        scratch.apply(mv);
        let king = scratch.king_location(self.active_color);
        !scratch.is_square_attacked_by(king.row, king.col, scratch.active_color)
    }
}
