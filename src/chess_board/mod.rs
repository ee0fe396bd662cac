pub mod error;
pub use error::ChessError;
pub mod fen;
pub use fen::INITIAL_POSITION;
pub mod zobrist_hash;
pub use zobrist_hash::ZobristHash;
pub use zobrist_hash::ZOBRIST;
pub mod model;
pub use model::{to_algebraic_square, ChessField, Color, Move, Piece, PieceType, Square};

mod board;
mod castle_rights;
mod game_state;
mod move_generation;
mod position;
pub mod test_utils;
pub use board::Board;
pub use castle_rights::CastleRights;
pub use game_state::GameState;
pub use position::Position;
