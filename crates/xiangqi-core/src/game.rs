use crate::board::Board;
use crate::movegen::{apply_move, generate_all_moves, is_square_attacked};
use crate::types::Color;

/// A side whose General is missing is never "in check"; the session treats
/// the capture itself as the end of the game.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .find_general(color)
        .is_some_and(|general| is_square_attacked(board, general, color.opposite()))
}

/// Whether some move of `color` leaves its General out of check. Stops at the
/// first escaping move found.
pub fn has_escape(board: &Board, color: Color) -> bool {
    generate_all_moves(board, color).iter().any(|mv| {
        let mut copy = board.clone();
        let _ = apply_move(&mut copy, mv.from, mv.to);
        !is_in_check(&copy, color)
    })
}

pub fn is_checkmate(board: &Board, color: Color) -> bool {
    is_in_check(board, color) && !has_escape(board, color)
}

pub fn is_stalemate(board: &Board, color: Color) -> bool {
    !is_in_check(board, color) && !has_escape(board, color)
}

pub fn is_general_captured(board: &Board, color: Color) -> bool {
    board.find_general(color).is_none()
}
