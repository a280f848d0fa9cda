use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::constants::{SQUARES, SQUARE_COUNT};
use crate::fen::encode_placement;
use crate::types::{Color, Piece, PieceKind, Square};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("square ({row}, {col}) out of bounds")]
    OutOfBounds { row: u8, col: u8 },
}

/// Occupancy of the 10x9 grid, stored flat as `row * 9 + col`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; SQUARE_COUNT],
}

impl Board {
    /// The standard opening position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_position();
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [None; SQUARE_COUNT],
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.index()] = piece;
    }

    pub fn piece_at_coords(&self, row: u8, col: u8) -> Result<Option<Piece>, BoardError> {
        let square = Square::new(row, col).ok_or(BoardError::OutOfBounds { row, col })?;
        Ok(self.piece_at(square))
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.cells[square.index()].is_none()
    }

    /// Occupied squares of `color` in board-scan order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        SQUARES.iter().filter_map(move |&square| {
            self.piece_at(square)
                .filter(|piece| piece.color == color)
                .map(|piece| (square, piece))
        })
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    pub fn find_general(&self, color: Color) -> Option<Square> {
        let general = Piece::new(PieceKind::General, color);
        SQUARES
            .iter()
            .copied()
            .find(|&square| self.piece_at(square) == Some(general))
    }

    fn setup_starting_position(&mut self) {
        self.load_back_rank(Color::Black);
        self.load_cannons_and_pawns(Color::Black);
        self.load_cannons_and_pawns(Color::Red);
        self.load_back_rank(Color::Red);
    }

    fn load_back_rank(&mut self, color: Color) {
        let row = match color {
            Color::Black => 0,
            Color::Red => 9,
        };
        const ORDER: [PieceKind; 9] = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];
        for (col, kind) in ORDER.into_iter().enumerate() {
            self.set(
                Square::new_unchecked(row, col as u8),
                Some(Piece::new(kind, color)),
            );
        }
    }

    fn load_cannons_and_pawns(&mut self, color: Color) {
        let (cannon_row, pawn_row) = match color {
            Color::Black => (2, 3),
            Color::Red => (7, 6),
        };
        let cannon = Piece::new(PieceKind::Cannon, color);
        let pawn = Piece::new(PieceKind::Pawn, color);

        self.set(Square::new_unchecked(cannon_row, 1), Some(cannon));
        self.set(Square::new_unchecked(cannon_row, 7), Some(cannon));
        for col in (0..9).step_by(2) {
            self.set(Square::new_unchecked(pawn_row, col), Some(pawn));
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_placement(self))
    }
}
