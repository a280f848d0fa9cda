use crate::board::Board;
use crate::constants::{forward, has_crossed_river, in_palace, on_own_side, SQUARES};
use crate::types::{Color, Move, MoveList, Piece, PieceKind, Square, SquareList};

/// Signed row/column displacement between two squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delta {
    row: i8,
    col: i8,
}

impl Delta {
    fn between(from: Square, to: Square) -> Self {
        Self {
            row: to.row as i8 - from.row as i8,
            col: to.col as i8 - from.col as i8,
        }
    }

    fn is_orthogonal(self) -> bool {
        (self.row == 0) != (self.col == 0)
    }

    fn manhattan(self) -> u8 {
        self.row.unsigned_abs() + self.col.unsigned_abs()
    }
}

/// Whether movement geometry for the piece on `from` reaches `to`, taking
/// blocking pieces into account but not the colors of origin and target.
pub fn is_legal_geometry(board: &Board, from: Square, to: Square) -> bool {
    if from == to {
        return false;
    }
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    let delta = Delta::between(from, to);

    match piece.kind {
        PieceKind::General => general_reaches(board, piece.color, from, to, delta),
        PieceKind::Advisor => {
            in_palace(to, piece.color)
                && delta.row.unsigned_abs() == 1
                && delta.col.unsigned_abs() == 1
        }
        PieceKind::Elephant => elephant_reaches(board, piece.color, from, to, delta),
        PieceKind::Horse => horse_reaches(board, from, delta),
        PieceKind::Chariot => {
            delta.is_orthogonal() && pieces_between(board, from, to) == Some(0)
        }
        PieceKind::Cannon => cannon_reaches(board, from, to, delta),
        PieceKind::Pawn => pawn_reaches(piece.color, from, delta),
    }
}

/// Geometry plus ownership: `from` holds a `color` piece and `to` does not.
/// Leaving one's own General in check is not tested here.
pub fn is_valid_move(board: &Board, color: Color, from: Square, to: Square) -> bool {
    match board.piece_at(from) {
        Some(piece) if piece.color == color => {}
        _ => return false,
    }
    if board.piece_at(to).is_some_and(|target| target.color == color) {
        return false;
    }
    is_legal_geometry(board, from, to)
}

/// Destinations reachable by the piece on `from`, in board-scan order.
pub fn generate_legal_moves(board: &Board, from: Square) -> SquareList {
    let mut out = SquareList::new();
    let Some(piece) = board.piece_at(from) else {
        return out;
    };
    for to in SQUARES {
        if is_valid_move(board, piece.color, from, to) {
            let _ = out.try_push(to);
        }
    }
    out
}

/// Every move of `color`: pieces in board-scan order, then destinations in
/// board-scan order.
pub fn generate_all_moves(board: &Board, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    for (from, piece) in board.pieces(color) {
        for to in generate_legal_moves(board, from) {
            let _ = moves.try_push(Move::new(from, to, piece, board.piece_at(to)));
        }
    }
    moves
}

/// Moves the piece on `from` to `to` unconditionally and returns the record.
pub fn apply_move(board: &mut Board, from: Square, to: Square) -> Option<Move> {
    let piece = board.piece_at(from)?;
    let mv = Move::new(from, to, piece, board.piece_at(to));
    board.set(to, Some(piece));
    board.set(from, None);
    Some(mv)
}

pub fn is_square_attacked(board: &Board, square: Square, by_color: Color) -> bool {
    board
        .pieces(by_color)
        .any(|(from, _)| is_valid_move(board, by_color, from, square))
}

/// Number of pieces strictly between two squares on the same row or file,
/// or `None` when they are not aligned.
pub fn pieces_between(board: &Board, from: Square, to: Square) -> Option<usize> {
    let delta = Delta::between(from, to);
    if !delta.is_orthogonal() {
        return None;
    }
    let step = (delta.row.signum(), delta.col.signum());
    let mut count = 0usize;
    let mut cursor = from.offset(step.0, step.1)?;
    while cursor != to {
        if !board.is_empty_at(cursor) {
            count += 1;
        }
        cursor = cursor.offset(step.0, step.1)?;
    }
    Some(count)
}

fn general_reaches(board: &Board, color: Color, from: Square, to: Square, delta: Delta) -> bool {
    // Flying general: capture the facing General across an empty file.
    let facing = Piece::new(PieceKind::General, color.opposite());
    if delta.col == 0
        && board.piece_at(to) == Some(facing)
        && pieces_between(board, from, to) == Some(0)
    {
        return true;
    }
    in_palace(to, color) && delta.manhattan() == 1
}

fn elephant_reaches(board: &Board, color: Color, from: Square, to: Square, delta: Delta) -> bool {
    if !on_own_side(to, color) || delta.row.unsigned_abs() != 2 || delta.col.unsigned_abs() != 2 {
        return false;
    }
    let eye = Square::new_unchecked((from.row + to.row) / 2, (from.col + to.col) / 2);
    board.is_empty_at(eye)
}

fn horse_reaches(board: &Board, from: Square, delta: Delta) -> bool {
    let leg = match (delta.row.unsigned_abs(), delta.col.unsigned_abs()) {
        (2, 1) => from.offset(delta.row / 2, 0),
        (1, 2) => from.offset(0, delta.col / 2),
        _ => return false,
    };
    leg.is_some_and(|leg| board.is_empty_at(leg))
}

fn cannon_reaches(board: &Board, from: Square, to: Square, delta: Delta) -> bool {
    if !delta.is_orthogonal() {
        return false;
    }
    let screens = pieces_between(board, from, to);
    if board.is_empty_at(to) {
        screens == Some(0)
    } else {
        screens == Some(1)
    }
}

fn pawn_reaches(color: Color, from: Square, delta: Delta) -> bool {
    if delta.row == forward(color) && delta.col == 0 {
        return true;
    }
    delta.row == 0 && delta.col.unsigned_abs() == 1 && has_crossed_river(from, color)
}
