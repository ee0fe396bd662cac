pub mod chess_board;
pub mod perft;

pub use chess_board::{ChessError, ChessField, Color, GameState, Move, Piece, PieceType, Square, INITIAL_POSITION};
