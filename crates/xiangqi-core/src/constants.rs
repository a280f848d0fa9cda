use crate::types::{Color, Square};

pub const BOARD_ROWS: usize = 10;
pub const BOARD_COLS: usize = 9;
pub const SQUARE_COUNT: usize = BOARD_ROWS * BOARD_COLS;

/// Palace files, shared by both sides.
pub const PALACE_COLS: core::ops::RangeInclusive<u8> = 3..=5;
pub const BLACK_PALACE_ROWS: core::ops::RangeInclusive<u8> = 0..=2;
pub const RED_PALACE_ROWS: core::ops::RangeInclusive<u8> = 7..=9;

/// Last row on Black's side of the river; Red's side starts one row below.
pub const RIVER_BLACK_EDGE: u8 = 4;
pub const RIVER_RED_EDGE: u8 = 5;

/// Every square in board-scan order: row 0 first, columns left to right.
pub const SQUARES: [Square; SQUARE_COUNT] = build_squares();

const fn build_squares() -> [Square; SQUARE_COUNT] {
    let mut out = [Square::new_unchecked(0, 0); SQUARE_COUNT];
    let mut i = 0;
    while i < SQUARE_COUNT {
        out[i] = Square::new_unchecked((i / BOARD_COLS) as u8, (i % BOARD_COLS) as u8);
        i += 1;
    }
    out
}

pub fn in_palace(square: Square, color: Color) -> bool {
    let rows = match color {
        Color::Red => RED_PALACE_ROWS,
        Color::Black => BLACK_PALACE_ROWS,
    };
    rows.contains(&square.row) && PALACE_COLS.contains(&square.col)
}

pub const fn on_own_side(square: Square, color: Color) -> bool {
    match color {
        Color::Red => square.row >= RIVER_RED_EDGE,
        Color::Black => square.row <= RIVER_BLACK_EDGE,
    }
}

pub const fn has_crossed_river(square: Square, color: Color) -> bool {
    !on_own_side(square, color)
}

/// Row step a pawn of `color` takes when advancing.
pub const fn forward(color: Color) -> i8 {
    match color {
        Color::Red => -1,
        Color::Black => 1,
    }
}
