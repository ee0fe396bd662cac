/// Errors of the checked entry points (FEN, coordinate input, strict moves).
/// The make/undo hot path never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}
