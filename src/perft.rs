use crate::chess_board::GameState;

/// Counts the leaf nodes of the legal move tree. Every move is made and taken
/// back on `state`, which ends up exactly as it started.
pub fn perft(state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1u64;
    }

    let moves = state.get_valid_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut node_count = 0u64;
    for mv in moves {
        state.make_move(mv);
        node_count += perft(state, depth - 1);
        state.undo_move();
    }
    node_count
}

/// Per-move subtree sizes at `depth`, sorted by move text.
pub fn perft_divide(state: &mut GameState, depth: u8) -> Vec<(String, u64)> {
    let mut result_moves = Vec::<(String, u64)>::new();
    for mv in state.get_valid_moves() {
        state.make_move(mv);
        result_moves.push((mv.as_algebraic(), perft(state, depth.saturating_sub(1))));
        state.undo_move();
    }
    result_moves.sort();
    result_moves
}
