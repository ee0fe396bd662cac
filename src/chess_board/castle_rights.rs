use super::{ChessField, Color};

/// Castling eligibility per color and side. Rights only ever get revoked;
/// undo restores earlier values from the log kept by `GameState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastleRights {
    pub fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    pub fn revoke_kingside(&mut self, color: Color) {
        match color {
            Color::White => self.white_kingside = false,
            Color::Black => self.black_kingside = false,
        }
    }

    pub fn revoke_queenside(&mut self, color: Color) {
        match color {
            Color::White => self.white_queenside = false,
            Color::Black => self.black_queenside = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke_kingside(color);
        self.revoke_queenside(color);
    }

    /// Revokes the right tied to a rook corner of `color`, if `field` is one.
    pub fn revoke_for_rook_square(&mut self, color: Color, field: ChessField) {
        if field.row != color.back_rank() {
            return;
        }
        match field.col {
            0 => self.revoke_queenside(color),
            7 => self.revoke_kingside(color),
            _ => {}
        }
    }

    /// Flags in FEN order: K, Q, k, q.
    pub fn as_array(&self) -> [bool; 4] {
        [
            self.white_kingside,
            self.white_queenside,
            self.black_kingside,
            self.black_queenside,
        ]
    }

    pub fn to_fen(&self) -> String {
        let castling: String = self
            .as_array()
            .iter()
            .zip("KQkq".chars())
            .filter_map(|(&right, c)| right.then_some(c))
            .collect();
        if castling.is_empty() {
            "-".to_string()
        } else {
            castling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_corners() {
        let mut rights = CastleRights::all();
        rights.revoke_for_rook_square(Color::White, ChessField::new(7, 0));
        assert_eq!(rights.to_fen(), "Kkq");
        rights.revoke_for_rook_square(Color::Black, ChessField::new(0, 7));
        assert_eq!(rights.to_fen(), "Kq");
        // a black rook leaving h1 says nothing about white's rights
        rights.revoke_for_rook_square(Color::Black, ChessField::new(7, 7));
        assert_eq!(rights.to_fen(), "Kq");
        rights.revoke_for_rook_square(Color::White, ChessField::new(7, 4));
        assert_eq!(rights.to_fen(), "Kq");
    }

    #[test]
    fn test_revoke_all() {
        let mut rights = CastleRights::all();
        rights.revoke_all(Color::Black);
        assert!(rights.kingside(Color::White) && rights.queenside(Color::White));
        assert!(!rights.kingside(Color::Black) && !rights.queenside(Color::Black));
        rights.revoke_all(Color::White);
        assert_eq!(rights, CastleRights::none());
        assert_eq!(rights.to_fen(), "-");
    }
}
