use super::error::ChessError;
use super::{Board, CastleRights, ChessField, Color, GameState, Piece, PieceType, Position, Square};

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn invalid(reason: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(reason.into())
}

fn parse_board(placement: &str) -> Result<Board, ChessError> {
    let mut board = Board::empty();
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(invalid("expected 8 rows"));
    }

    // FEN lists rank 8 first, which is row 0 here
    for (row_index, row) in rows.iter().enumerate() {
        let mut col_index = 0usize;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                col_index += skip as usize;
            } else {
                let piece = Piece::from_char(c).ok_or_else(|| invalid(format!("invalid piece character {}", c)))?;
                if col_index > 7 {
                    return Err(invalid(format!("too many squares in row {}", row_index)));
                }
                board.squares[row_index][col_index] = Square::Occupied(piece);
                col_index += 1;
            }
        }
        if col_index != 8 {
            return Err(invalid(format!("row {} covers {} squares", row_index, col_index)));
        }
    }

    Ok(board)
}

fn parse_castling(castling: &str) -> Result<CastleRights, ChessError> {
    if castling == "-" {
        return Ok(CastleRights::none());
    }
    let mut rights = CastleRights::none();
    for c in castling.chars() {
        match c {
            'K' => rights.white_kingside = true,
            'Q' => rights.white_queenside = true,
            'k' => rights.black_kingside = true,
            'q' => rights.black_queenside = true,
            _ => return Err(invalid(format!("invalid castling rights {}", castling))),
        }
    }
    Ok(rights)
}

fn find_king(board: &Board, color: Color) -> Result<ChessField, ChessError> {
    match board.find_pieces(Piece::new(color, PieceType::King)).as_slice() {
        [king] => Ok(*king),
        kings => Err(invalid(format!("expected one {} king, found {}", color, kings.len()))),
    }
}

/// The target must be the empty square a pawn of the side that just moved
/// skipped over, with that pawn right behind it.
fn check_en_passant(board: &Board, active_color: Color, target: ChessField) -> Result<(), ChessError> {
    let mover = active_color.opposite();
    let skipped_row = mover.pawn_start_row() as isize + mover.forward();
    let pawn_behind = target
        .offset(mover.forward(), 0)
        .is_some_and(|field| board[field].is(mover, PieceType::Pawn));

    if target.row as isize == skipped_row && board[target].is_empty() && pawn_behind {
        Ok(())
    } else {
        Err(invalid(format!("no {} pawn just passed {}", mover, target)))
    }
}

/// Parses a FEN string into a game state. The two move counters may be
/// omitted and default to `0 1`.
pub fn from_fen(fen: &str) -> Result<GameState, ChessError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 4 && parts.len() != 6 {
        return Err(invalid("must have 4 or 6 parts"));
    }

    let board = parse_board(parts[0])?;

    let active_color = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(invalid("invalid active color")),
    };

    let castling_rights = parse_castling(parts[2])?;

    let en_passant = if parts[3] == "-" {
        None
    } else {
        let target =
            ChessField::from_algebraic(parts[3]).map_err(|_| invalid(format!("invalid en passant square {}", parts[3])))?;
        check_en_passant(&board, active_color, target)?;
        Some(target)
    };

    let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
        let halfmove = parts[4]
            .parse::<u32>()
            .map_err(|_| invalid(format!("halfmove clock is not a valid number: {}", parts[4])))?;
        let fullmove = parts[5]
            .parse::<u32>()
            .map_err(|_| invalid(format!("fullmove number is not a valid number: {}", parts[5])))?;
        (halfmove, fullmove)
    } else {
        (0, 1)
    };

    let position = Position {
        board,
        active_color,
        white_king_location: find_king(&board, Color::White)?,
        black_king_location: find_king(&board, Color::Black)?,
        en_passant,
        castling_rights,
    };

    Ok(GameState::from_position(position, halfmove_clock, fullmove_number))
}

pub fn to_fen(state: &GameState) -> String {
    let board = state.board();
    let mut board_representation = String::new();

    for (row, squares) in board.squares.iter().enumerate() {
        let mut empty_count = 0;

        for square in squares {
            match square {
                Square::Occupied(piece) => {
                    if empty_count > 0 {
                        board_representation.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    board_representation.push(piece.to_char());
                }
                Square::Empty => {
                    empty_count += 1;
                }
            }
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if row < 7 {
            board_representation.push('/');
        }
    }

    let active_color = if state.active_color() == Color::White { "w" } else { "b" };

    let en_passant_square = match state.en_passant() {
        Some(square) => square.as_algebraic(),
        None => "-".to_string(),
    };

    format!(
        "{} {} {} {} {} {}",
        board_representation,
        active_color,
        state.castling_rights().to_fen(),
        en_passant_square,
        state.halfmove_clock(),
        state.fullmove_number()
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fen_initial_board() {
        let state = from_fen(INITIAL_POSITION).expect("Failed to parse FEN");

        for col in 0..8 {
            assert_eq!(board_at(&state, 6, col), Square::Occupied(Piece::new(Color::White, PieceType::Pawn)));
            assert_eq!(board_at(&state, 1, col), Square::Occupied(Piece::new(Color::Black, PieceType::Pawn)));
        }
        assert_eq!(board_at(&state, 0, 0), Square::Occupied(Piece::new(Color::Black, PieceType::Rook)));
        assert_eq!(board_at(&state, 7, 4), Square::Occupied(Piece::new(Color::White, PieceType::King)));
        assert_eq!(board_at(&state, 4, 4), Square::Empty);

        assert_eq!(*state.position(), Position::starting());
        assert_eq!(state.halfmove_clock(), 0);
        assert_eq!(state.fullmove_number(), 1);
    }

    fn board_at(state: &GameState, row: usize, col: usize) -> Square {
        state.board().squares[row][col]
    }

    #[test]
    fn fen_king_locations() {
        let state = from_fen("8/8/8/3k4/8/8/6K1/8 b - - 0 1").unwrap();
        assert_eq!(state.king_location(Color::Black), ChessField::from_algebraic("d5").unwrap());
        assert_eq!(state.king_location(Color::White), ChessField::from_algebraic("g2").unwrap());
        assert_eq!(state.active_color(), Color::Black);
    }

    #[test]
    fn fen_requires_one_king_per_color() {
        assert!(matches!(from_fen("8/8/8/8/8/8/8/P7 w - - 0 1"), Err(ChessError::InvalidFen(_))));
        assert!(from_fen("k7/8/8/8/8/8/8/KK6 w - - 0 1").is_err());
    }

    #[test]
    fn fen_invalid_square() {
        assert!(from_fen("k7/8/8/8/8/8/8/X6K w - - 0 1").is_err());
    }

    #[test]
    fn fen_invalid_fen_extra_columns() {
        let fen = "rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(from_fen(fen).is_err());
    }

    #[test]
    fn fen_short_row() {
        let fen = "rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(from_fen(fen).is_err());
    }

    #[test]
    fn test_invalid_fen_missing_parts() {
        assert!(from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w").is_err());
    }

    #[test]
    fn test_en_passant_parsing() {
        let state = from_fen("4k3/8/8/8/4pP2/8/8/4K3 b - f3 0 1").expect("Failed to parse FEN");
        assert_eq!(state.active_color(), Color::Black);
        assert_eq!(state.en_passant(), Some(ChessField::from_algebraic("f3").unwrap()));
        assert!(from_fen("4k3/8/8/8/4pP2/8/8/4K3 b - z3 0 1").is_err());
    }

    #[test]
    fn test_en_passant_square_needs_a_pawn_that_just_advanced() {
        // a king behind the target square
        assert!(matches!(
            from_fen("8/8/8/3kP3/8/8/8/4K3 w - d6 0 1"),
            Err(ChessError::InvalidFen(_))
        ));
        // wrong rank for the side to move
        assert!(from_fen("4k3/8/8/8/4pP2/8/8/4K3 w - f3 0 1").is_err());
        assert!(from_fen("4k3/8/8/8/4pP2/8/8/4K3 b - e4 0 1").is_err());
        // occupied target square
        assert!(from_fen("4k3/8/8/8/4pP2/5N2/8/4K3 b - f3 0 1").is_err());

        let state = from_fen("8/8/8/3pP3/8/8/8/4K2k w - d6 0 1").unwrap();
        assert_eq!(state.en_passant(), Some(ChessField::from_algebraic("d6").unwrap()));
    }

    #[test]
    fn fen_castling_rights() {
        let state = from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        assert_eq!(state.castling_rights().as_array(), [true, false, false, true]);
        assert!(from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kx - 0 1").is_err());
    }

    #[test]
    fn fen_counters_are_optional() {
        let state = from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(state.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn test_to_fen_initial_position() {
        let state = from_fen(INITIAL_POSITION).unwrap();
        assert_eq!(to_fen(&state), INITIAL_POSITION);
    }

    #[test]
    fn test_to_fen_custom_position() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b Kq e3 0 1";
        let state = from_fen(fen).unwrap();
        assert_eq!(to_fen(&state), fen);
    }

    #[test]
    fn test_to_fen_after_moves() {
        let mut state = GameState::new();
        state.make_move_from_algebraic("e2e4").unwrap();
        assert_eq!(state.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        state.make_move_from_algebraic("g8f6").unwrap();
        assert_eq!(state.to_fen(), "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2");
        state.make_move_from_algebraic("e1e2").unwrap();
        assert_eq!(state.to_fen(), "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPPKPPP/RNBQ1BNR b kq - 2 2");
    }
}
