use super::{ChessField, Color, Piece, Position};
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::sync::Arc;

const BOARD_SIZE: usize = 8;

/// Random keys XORed together per feature of a position: one per (color,
/// piece kind, square), one for black to move, one per castling right and
/// one per en passant file.
pub struct ZobristHash {
    piece_keys: [[[u64; BOARD_SIZE * BOARD_SIZE]; 6]; 2],
    side_to_move_key: u64,
    castling_keys: [u64; 4],
    en_passant_keys: [u64; BOARD_SIZE],
}

fn random_keys<const N: usize>(rng: &mut Pcg64) -> [u64; N] {
    std::array::from_fn(|_| rng.gen())
}

impl ZobristHash {
    fn new(seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        // draw order is part of the key layout: pieces, side, castling, en passant
        let piece_keys: [[[u64; BOARD_SIZE * BOARD_SIZE]; 6]; 2] =
            std::array::from_fn(|_| std::array::from_fn(|_| random_keys(&mut rng)));
        Self {
            piece_keys,
            side_to_move_key: rng.gen(),
            castling_keys: random_keys(&mut rng),
            en_passant_keys: random_keys(&mut rng),
        }
    }

    fn piece_key(&self, piece: Piece, field: ChessField) -> u64 {
        let square = field.row as usize * BOARD_SIZE + field.col as usize;
        self.piece_keys[piece.color as usize][piece.kind.index()][square]
    }

    pub fn calculate_hash(&self, position: &Position) -> u64 {
        let mut hash = position
            .board
            .pieces_with_coordinates()
            .fold(0, |hash, (field, piece)| hash ^ self.piece_key(piece, field));

        if position.active_color == Color::Black {
            hash ^= self.side_to_move_key;
        }

        let rights = position.castling_rights.as_array();
        for (key, _) in self.castling_keys.iter().zip(rights).filter(|(_, right)| *right) {
            hash ^= key;
        }

        if let Some(en_passant) = position.en_passant {
            hash ^= self.en_passant_keys[en_passant.col as usize];
        }

        hash
    }
}

lazy_static! {
    pub static ref ZOBRIST: Arc<ZobristHash> = Arc::new(ZobristHash::new(42));
}
