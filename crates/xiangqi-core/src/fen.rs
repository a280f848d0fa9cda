use thiserror::Error;

use crate::board::Board;
use crate::constants::{BOARD_COLS, BOARD_ROWS};
use crate::types::{Color, Piece, Square};

pub const START_POSITION: &str =
    "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFen {
    pub board: Board,
    pub turn: Color,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("empty position string")]
    Empty,
    #[error("expected 10 rows, received {0}")]
    RowCount(usize),
    #[error("row {row} describes {columns} columns, expected 9")]
    RowLength { row: usize, columns: usize },
    #[error("unknown token {token:?} in row {row}")]
    UnknownToken { row: usize, token: char },
    #[error("missing side-to-move field")]
    MissingSideToMove,
    #[error("invalid side-to-move field {0:?}, expected 'w' or 'b'")]
    InvalidSideToMove(String),
}

/// Decodes `<row0>/.../<row9> <w|b>`. Any fields after the side marker are
/// ignored. The board is built from scratch, so a failed parse leaves no
/// partial state behind.
pub fn parse_fen(fen: &str) -> Result<ParsedFen, FenError> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or(FenError::Empty)?;
    let side = fields.next().ok_or(FenError::MissingSideToMove)?;

    let board = parse_placement(placement)?;
    let turn = side_from_field(side)?;
    Ok(ParsedFen { board, turn })
}

pub fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != BOARD_ROWS {
        return Err(FenError::RowCount(rows.len()));
    }

    let mut board = Board::empty();
    for (row, desc) in rows.into_iter().enumerate() {
        let mut col = 0usize;
        for ch in desc.chars() {
            match ch {
                '1'..='9' => col += ch as usize - '0' as usize,
                _ => {
                    let piece =
                        Piece::from_fen_char(ch).ok_or(FenError::UnknownToken { row, token: ch })?;
                    if col < BOARD_COLS {
                        board.set(Square::new_unchecked(row as u8, col as u8), Some(piece));
                    }
                    col += 1;
                }
            }
        }
        if col != BOARD_COLS {
            return Err(FenError::RowLength { row, columns: col });
        }
    }
    Ok(board)
}

pub fn encode_fen(board: &Board, turn: Color) -> String {
    format!("{} {}", encode_placement(board), turn.to_code())
}

pub fn encode_placement(board: &Board) -> String {
    let mut placement = String::with_capacity(BOARD_ROWS * (BOARD_COLS + 1));
    for row in 0..BOARD_ROWS as u8 {
        let mut empties = 0u32;
        for col in 0..BOARD_COLS as u8 {
            match board.piece_at(Square::new_unchecked(row, col)) {
                Some(piece) => {
                    if empties > 0 {
                        placement.push(char::from_digit(empties, 10).unwrap_or('9'));
                        empties = 0;
                    }
                    placement.push(piece.fen_char());
                }
                None => empties += 1,
            }
        }
        if empties > 0 {
            placement.push(char::from_digit(empties, 10).unwrap_or('9'));
        }
        if usize::from(row) + 1 < BOARD_ROWS {
            placement.push('/');
        }
    }
    placement
}

fn side_from_field(field: &str) -> Result<Color, FenError> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => {
            Color::from_code(code).ok_or_else(|| FenError::InvalidSideToMove(field.to_string()))
        }
        _ => Err(FenError::InvalidSideToMove(field.to_string())),
    }
}
