use super::{ChessField, Color, Move, PieceType, Position, Square};

const KNIGHT_MOVES: [(isize, isize); 8] = [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];
const KING_MOVES: [(isize, isize); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
const ROOK_DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// What the generator is asked for. Attack maps differ from moves only for
/// pawns: they attack both diagonals whatever stands there and never attack
/// the square in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generation {
    Moves,
    Attacks,
}

impl Position {
    /// Every pseudo-legal move of the side to move, castling excluded.
    pub fn generate_pseudo_moves(&self) -> Vec<Move> {
        self.generate(Generation::Moves)
    }

    pub fn generate_pseudo_moves_from_position(&self, row: u8, col: u8) -> Vec<Move> {
        let mut moves = Vec::new();
        self.generate_from_field(ChessField::new(row, col), Generation::Moves, &mut moves);
        moves
    }

    fn generate(&self, generation: Generation) -> Vec<Move> {
        let mut all_moves = Vec::with_capacity(64);
        for (field, piece) in self.board.pieces_with_coordinates() {
            if piece.color == self.active_color {
                self.generate_from_field(field, generation, &mut all_moves);
            }
        }
        all_moves
    }

    fn generate_from_field(&self, from: ChessField, generation: Generation, moves: &mut Vec<Move>) {
        let piece = match self.board[from] {
            Square::Occupied(piece) if piece.color == self.active_color => piece,
            _ => return,
        };
        match (piece.kind, generation) {
            (PieceType::Pawn, Generation::Moves) => self.generate_pawn_moves(from, moves),
            (PieceType::Pawn, Generation::Attacks) => self.generate_pawn_attacks(from, moves),
            (PieceType::Knight, _) => self.generate_moves_from_directions(from, &KNIGHT_MOVES, moves),
            (PieceType::Bishop, _) => self.generate_sliding_moves(from, &BISHOP_DIRECTIONS, moves),
            (PieceType::Rook, _) => self.generate_sliding_moves(from, &ROOK_DIRECTIONS, moves),
            (PieceType::Queen, _) => {
                self.generate_sliding_moves(from, &ROOK_DIRECTIONS, moves);
                self.generate_sliding_moves(from, &BISHOP_DIRECTIONS, moves);
            }
            (PieceType::King, _) => self.generate_moves_from_directions(from, &KING_MOVES, moves),
        }
    }

    fn generate_pawn_moves(&self, from: ChessField, moves: &mut Vec<Move>) {
        let color = self.active_color;
        let forward = color.forward();

        // nothing ahead: a pawn on the last row (only reachable through FEN)
        let Some(one_forward) = from.offset(forward, 0) else {
            return;
        };

        if self.board[one_forward].is_empty() {
            moves.push(Move::new(from, one_forward, &self.board));

            if from.row == color.pawn_start_row() {
                if let Some(two_forward) = from.offset(2 * forward, 0) {
                    if self.board[two_forward].is_empty() {
                        moves.push(Move::new(from, two_forward, &self.board));
                    }
                }
            }
        }

        for d_col in [-1, 1] {
            let Some(target) = from.offset(forward, d_col) else {
                continue;
            };
            match self.board[target] {
                Square::Occupied(piece) if piece.color != color => {
                    moves.push(Move::new(from, target, &self.board));
                }
                Square::Empty if self.en_passant == Some(target) => {
                    moves.push(Move::en_passant(from, target, &self.board));
                }
                _ => {}
            }
        }
    }

    fn generate_pawn_attacks(&self, from: ChessField, moves: &mut Vec<Move>) {
        for d_col in [-1, 1] {
            if let Some(target) = from.offset(self.active_color.forward(), d_col) {
                if !self.board[target].has_color(self.active_color) {
                    moves.push(Move::new(from, target, &self.board));
                }
            }
        }
    }

    /// Rook, bishop and queen rays: stop before a friendly piece, stop after
    /// capturing an enemy one.
    fn generate_sliding_moves(&self, from: ChessField, directions: &[(isize, isize)], moves: &mut Vec<Move>) {
        for &(d_row, d_col) in directions {
            let mut current = from;
            while let Some(next) = current.offset(d_row, d_col) {
                match self.board[next] {
                    Square::Empty => moves.push(Move::new(from, next, &self.board)),
                    Square::Occupied(piece) => {
                        if piece.color != self.active_color {
                            moves.push(Move::new(from, next, &self.board));
                        }
                        break;
                    }
                }
                current = next;
            }
        }
    }

    /// Knight and king: single jumps onto anything but a friendly piece.
    fn generate_moves_from_directions(&self, from: ChessField, offsets: &[(isize, isize)], moves: &mut Vec<Move>) {
        for &(d_row, d_col) in offsets {
            if let Some(target) = from.offset(d_row, d_col) {
                if !self.board[target].has_color(self.active_color) {
                    moves.push(Move::new(from, target, &self.board));
                }
            }
        }
    }

    /// Appends the castle moves available to the side to move.
    pub fn generate_castle_moves(&self, moves: &mut Vec<Move>) {
        let color = self.active_color;
        let king = self.king_location(color);
        if king != ChessField::new(color.back_rank(), 4) || !self.board[king].is(color, PieceType::King) {
            return;
        }
        if self.square_under_attack(king.row, king.col) {
            return;
        }
        if self.castling_rights.kingside(color) {
            self.generate_kingside_castle_move(king, moves);
        }
        if self.castling_rights.queenside(color) {
            self.generate_queenside_castle_move(king, moves);
        }
    }

    fn generate_kingside_castle_move(&self, king: ChessField, moves: &mut Vec<Move>) {
        let row = king.row;
        if !self.board[ChessField::new(row, 7)].is(self.active_color, PieceType::Rook) {
            return;
        }
        let path = [ChessField::new(row, 5), ChessField::new(row, 6)];
        if path.iter().all(|&field| self.board[field].is_empty())
            && !path.iter().any(|field| self.square_under_attack(field.row, field.col))
        {
            moves.push(Move::castle(king, ChessField::new(row, 6), &self.board));
        }
    }

    fn generate_queenside_castle_move(&self, king: ChessField, moves: &mut Vec<Move>) {
        let row = king.row;
        if !self.board[ChessField::new(row, 0)].is(self.active_color, PieceType::Rook) {
            return;
        }
        let between = [ChessField::new(row, 3), ChessField::new(row, 2), ChessField::new(row, 1)];
        // the b-file square must be empty but the king never crosses it
        let king_path = &between[..2];
        if between.iter().all(|&field| self.board[field].is_empty())
            && !king_path.iter().any(|field| self.square_under_attack(field.row, field.col))
        {
            moves.push(Move::castle(king, ChessField::new(row, 2), &self.board));
        }
    }

    /// Whether the side not to move could move a piece onto `(row, col)`.
    pub fn square_under_attack(&self, row: u8, col: u8) -> bool {
        self.is_square_attacked_by(row, col, self.active_color.opposite())
    }

    /// Runs `attacker`'s generator on a copy flipped to its turn and looks for
    /// a move landing on `(row, col)`.
    pub fn is_square_attacked_by(&self, row: u8, col: u8, attacker: Color) -> bool {
        let target = ChessField::new(row, col);
        let mut attacker_view = *self;
        attacker_view.active_color = attacker;
        attacker_view.generate(Generation::Attacks).iter().any(|mv| mv.to == target)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::assert_moves;
    use super::super::GameState;
    use super::*;

    fn pseudo_moves_from(fen: &str, square: &str) -> Vec<Move> {
        let state = GameState::from_fen(fen).unwrap();
        let field = ChessField::from_algebraic(square).unwrap();
        state.position().generate_pseudo_moves_from_position(field.row, field.col)
    }

    #[test]
    fn test_generate_pawn_moves_pseudo_legal() {
        // single and double step from the start row
        let moves = pseudo_moves_from("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", "e2");
        assert_moves(moves.into_iter(), vec!["e2e3", "e2e4"]);

        // blocked pawn a3 by a4
        let moves = pseudo_moves_from("4k3/8/8/8/P7/P7/8/4K3 w - - 0 1", "a3");
        assert_moves(moves.into_iter(), vec![]);

        // double step blocked on the second square only
        let moves = pseudo_moves_from("4k3/p7/8/p7/8/8/8/4K3 b - - 0 1", "a7");
        assert_moves(moves.into_iter(), vec!["a7a6"]);

        // captures on both sides, never onto an own piece
        let moves = pseudo_moves_from("4k3/8/8/8/8/p1P5/1P6/4K3 w - - 0 1", "b2");
        assert_moves(moves.into_iter(), vec!["b2b3", "b2b4", "b2a3"]);

        // en passant on f6 next to a plain capture on d6
        let moves = pseudo_moves_from("4k3/8/3p4/4Pp2/8/8/8/4K3 w - f6 0 1", "e5");
        assert_moves(moves.into_iter(), vec!["e5d6", "e5e6", "e5f6"]);

        // promotion is a single move per destination
        let moves = pseudo_moves_from("3r3k/2P5/8/8/8/8/8/4K3 w - - 0 1", "c7");
        assert_moves(moves.into_iter(), vec!["c7c8q", "c7d8q"]);

        // black promotion with a capture
        let moves = pseudo_moves_from("4k3/8/8/8/8/8/1p6/2R1K3 b - - 0 1", "b2");
        assert_moves(moves.into_iter(), vec!["b2b1q", "b2c1q"]);
    }

    #[test]
    fn test_pawn_on_last_row_generates_nothing() {
        let moves = pseudo_moves_from("P3k3/8/8/8/8/8/8/4K3 w - - 0 1", "a8");
        assert_moves(moves.into_iter(), vec![]);
    }

    #[test]
    fn test_en_passant_move_is_flagged() {
        let moves = pseudo_moves_from("4k3/8/8/4Pp2/8/8/8/4K3 w - f6 0 1", "e5");
        let ep = moves.iter().find(|mv| mv.to.as_algebraic() == "f6").unwrap();
        assert!(ep.is_en_passant_move);
        assert!(ep.is_capture());
        let push = moves.iter().find(|mv| mv.to.as_algebraic() == "e6").unwrap();
        assert!(!push.is_en_passant_move);
    }

    #[test]
    fn test_generate_knight_moves_pseudo_legal() {
        let moves = pseudo_moves_from("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1", "d4");
        assert_moves(
            moves.into_iter(),
            vec!["d4b3", "d4c2", "d4e2", "d4f3", "d4f5", "d4e6", "d4c6", "d4b5"],
        );

        // white knight at a3 with own pieces in the way and two captures
        let moves = pseudo_moves_from("4k3/8/8/1r6/2r5/N7/2B5/1Q2K3 w - - 0 1", "a3");
        assert_moves(moves.into_iter(), vec!["a3c4", "a3b5"]);
    }

    #[test]
    fn test_generate_bishop_moves_pseudo_legal() {
        let moves = pseudo_moves_from("4k3/8/8/8/3B4/8/8/K7 w - - 0 1", "d4");
        assert_moves(
            moves.into_iter(),
            vec![
                "d4a7", "d4b6", "d4c5", "d4e3", "d4f2", "d4g1", "d4b2", "d4c3", "d4e5", "d4f6", "d4g7", "d4h8",
            ],
        );

        // a capture and a blocked square
        let moves = pseudo_moves_from("4k3/6r1/5B2/8/3P4/8/8/K7 w - - 0 1", "f6");
        assert_moves(moves.into_iter(), vec!["f6e7", "f6d8", "f6g5", "f6h4", "f6e5", "f6g7"]);
    }

    #[test]
    fn test_generate_rook_moves_pseudo_legal() {
        let moves = pseudo_moves_from("7k/8/8/8/3bR3/8/4N3/K7 w - - 0 1", "e4");
        assert_moves(
            moves.into_iter(),
            vec!["e4e3", "e4e5", "e4e6", "e4e7", "e4e8", "e4d4", "e4f4", "e4g4", "e4h4"],
        );
    }

    #[test]
    fn test_generate_queen_moves_pseudo_legal() {
        // three captures and one blocked direction
        let moves = pseudo_moves_from("4b1b1/6b1/4r1Q1/5P2/6B1/8/8/K6k w - - 0 1", "g6");
        assert_moves(
            moves.into_iter(),
            vec!["g6e8", "g6f7", "g6e6", "g6f6", "g6g7", "g6g5", "g6h5", "g6h6", "g6h7"],
        );
    }

    #[test]
    fn test_generate_king_moves_pseudo_legal() {
        // blocked by own pieces, three captures
        let moves = pseudo_moves_from("k7/8/8/3ppp2/3PKP2/3PPP2/8/8 w - - 0 1", "e4");
        assert_moves(moves.into_iter(), vec!["e4d5", "e4e5", "e4f5"]);

        // corner
        let moves = pseudo_moves_from("K7/8/8/8/8/8/8/7k b - - 0 1", "h1");
        assert_moves(moves.into_iter(), vec!["h1h2", "h1g1", "h1g2"]);

        // castling never comes out of the plain generator
        let moves = pseudo_moves_from("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1", "e1");
        assert_moves(moves.into_iter(), vec!["e1d1", "e1f1"]);
    }

    #[test]
    fn test_generate_castle_moves() {
        let state = GameState::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let mut moves = Vec::new();
        state.position().generate_castle_moves(&mut moves);
        assert_moves(moves.iter().copied(), vec!["e1g1", "e1c1"]);
        assert!(moves.iter().all(|mv| mv.is_castle_move));

        let state = GameState::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1").unwrap();
        let mut moves = Vec::new();
        state.position().generate_castle_moves(&mut moves);
        assert_moves(moves.into_iter(), vec!["e8g8", "e8c8"]);
    }

    #[test]
    fn test_queenside_castle_needs_b_file_empty() {
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1").unwrap();
        let mut moves = Vec::new();
        state.position().generate_castle_moves(&mut moves);
        assert_moves(moves.into_iter(), vec!["e1g1"]);
    }

    #[test]
    fn test_attacked_b_file_does_not_stop_queenside_castle() {
        // black rook on b8 hits b1 only, which the king never crosses
        let state = GameState::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let mut moves = Vec::new();
        state.position().generate_castle_moves(&mut moves);
        assert_moves(moves.into_iter(), vec!["e1c1"]);
    }

    #[test]
    fn test_castling_without_rook_is_not_offered() {
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w KQ - 0 1").unwrap();
        let mut moves = Vec::new();
        state.position().generate_castle_moves(&mut moves);
        assert!(moves.is_empty());
    }

    #[test]
    fn test_if_field_is_attacked() {
        let state = GameState::from_fen("k7/2P5/8/8/8/8/3p4/K7 w - - 0 1").unwrap();
        let position = state.position();
        // black pawn on d2 attacks c1 and e1, not d1
        assert!(position.square_under_attack(7, 2));
        assert!(!position.square_under_attack(7, 3));
        assert!(position.square_under_attack(7, 4));

        // white pawn on c7 attacks b8 and d8, not c8
        assert!(position.is_square_attacked_by(0, 1, Color::White));
        assert!(!position.is_square_attacked_by(0, 2, Color::White));
        assert!(position.is_square_attacked_by(0, 3, Color::White));
    }

    #[test]
    fn test_sliders_are_blocked() {
        let state = GameState::from_fen("k3r3/8/8/4P3/8/8/8/K7 w - - 0 1").unwrap();
        let position = state.position();
        assert!(position.square_under_attack(3, 4));
        assert!(!position.square_under_attack(4, 4));
    }
}
