//! Per-move export tokens for history and replay collaborators.
//!
//! A token is `<pieceLetter><fromCol><fromRow>-<toCol><toRow>`, e.g. `P06-05`
//! for the Red pawn on row 6, column 0 advancing one row. The piece letter
//! follows the position codec's case convention.

use thiserror::Error;

use crate::types::{Color, GameResult, Move, Piece, Square, Winner};

pub const RED_WINS: &str = "1-0";
pub const BLACK_WINS: &str = "0-1";
pub const DRAWN: &str = "1/2-1/2";
pub const UNFINISHED: &str = "*";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("malformed move token {0:?}")]
    Malformed(String),
    #[error("unknown piece letter {0:?}")]
    UnknownPiece(char),
    #[error("coordinate out of range in {0:?}")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveToken {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
}

pub fn move_token(mv: &Move) -> String {
    format!(
        "{}{}{}-{}{}",
        mv.piece.fen_char(),
        mv.from.col,
        mv.from.row,
        mv.to.col,
        mv.to.row
    )
}

pub fn parse_move_token(token: &str) -> Result<MoveToken, NotationError> {
    let malformed = || NotationError::Malformed(token.to_string());
    let chars: Vec<char> = token.trim().chars().collect();
    if chars.len() != 6 || chars[3] != '-' {
        return Err(malformed());
    }

    let piece = Piece::from_fen_char(chars[0]).ok_or(NotationError::UnknownPiece(chars[0]))?;
    let digit = |ch: char| ch.to_digit(10).map(|d| d as u8).ok_or_else(malformed);
    let (from_col, from_row) = (digit(chars[1])?, digit(chars[2])?);
    let (to_col, to_row) = (digit(chars[4])?, digit(chars[5])?);

    let out_of_range = || NotationError::OutOfRange(token.to_string());
    Ok(MoveToken {
        piece,
        from: Square::new(from_row, from_col).ok_or_else(out_of_range)?,
        to: Square::new(to_row, to_col).ok_or_else(out_of_range)?,
    })
}

pub fn result_token(result: Option<GameResult>) -> &'static str {
    match result.map(|r| r.winner) {
        Some(Winner::Side(Color::Red)) => RED_WINS,
        Some(Winner::Side(Color::Black)) => BLACK_WINS,
        Some(Winner::Draw) => DRAWN,
        None => UNFINISHED,
    }
}

/// Newline-separated move tokens followed by the result token.
pub fn export_game(history: &[Move], result: Option<GameResult>) -> String {
    let mut out = String::with_capacity(history.len() * 7 + 8);
    for mv in history {
        out.push_str(&move_token(mv));
        out.push('\n');
    }
    out.push_str(result_token(result));
    out
}
