//! Xiangqi (Chinese Chess) rules engine.
//!
//! The board is a 10x9 grid with row 0 on Black's back rank and row 9 on
//! Red's. [`movegen`] answers per-piece legality, [`game`] detects check and
//! terminal states, [`fen`] converts positions to and from text, and
//! [`session::GameSession`] owns a running game and publishes [`GameEvent`]s.

pub mod board;
pub mod constants;
pub mod eval;
pub mod events;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod search;
pub mod session;
pub mod types;

pub use board::{Board, BoardError};
pub use constants::{in_palace, on_own_side, SQUARES};
pub use eval::Evaluator;
pub use events::GameEvent;
pub use fen::{encode_fen, encode_placement, parse_fen, FenError, ParsedFen, START_POSITION};
pub use game::{has_escape, is_checkmate, is_general_captured, is_in_check, is_stalemate};
pub use movegen::{
    apply_move, generate_all_moves, generate_legal_moves, is_legal_geometry, is_valid_move,
};
pub use notation::{export_game, move_token, parse_move_token, MoveToken, NotationError};
pub use search::{SearchLimits, SearchResult, Searcher};
pub use session::{AiRequest, GameSession};
pub use types::{
    Color, Difficulty, EndReason, GameMode, GameResult, Move, MoveList, Piece, PieceKind, Score,
    SessionState, Square, SquareList, Winner,
};
