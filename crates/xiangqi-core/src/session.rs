use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{debug, info};

use crate::board::Board;
use crate::events::GameEvent;
use crate::fen::{encode_fen, parse_fen, FenError, ParsedFen};
use crate::game::{is_checkmate, is_general_captured, is_stalemate};
use crate::movegen::{apply_move, is_valid_move};
use crate::notation::{export_game, move_token};
use crate::types::{
    Color, Difficulty, EndReason, GameMode, GameResult, Move, PieceKind, SessionState, Square,
    Winner,
};

/// Snapshot handed to the search engine when the AI is to move. `ply` is the
/// history length the snapshot was taken at, so a late answer can be matched
/// against the session it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiRequest {
    pub board: Board,
    pub color: Color,
    pub difficulty: Difficulty,
    pub ply: usize,
}

/// Authoritative game state. All mutation goes through `init_game`,
/// `make_move` and the explicit ending helpers.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    current_player: Color,
    history: Vec<Move>,
    state: SessionState,
    mode: GameMode,
    result: Option<GameResult>,
    subscribers: Vec<Sender<GameEvent>>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Color::Red,
            history: Vec::new(),
            state: SessionState::Uninitialized,
            mode: GameMode::default(),
            result: None,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Starts a game from `fen`, or from the standard opening with Red to
    /// move. On a decode error the session is left untouched.
    pub fn init_game(&mut self, mode: GameMode, fen: Option<&str>) -> Result<(), FenError> {
        let parsed = match fen {
            Some(fen) => parse_fen(fen)?,
            None => ParsedFen {
                board: Board::new(),
                turn: Color::Red,
            },
        };

        self.board = parsed.board;
        self.current_player = parsed.turn;
        self.history.clear();
        self.result = None;
        self.mode = mode;
        self.state = SessionState::Active;
        info!("game started: mode={:?} fen={}", mode, self.fen());

        self.emit(GameEvent::GameInit {
            game_mode: mode,
            board: self.board.clone(),
            current_player: self.current_player,
        });
        Ok(())
    }

    /// Replaces the board wholesale, e.g. when stepping through a replay.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let parsed = parse_fen(fen)?;
        self.board = parsed.board;
        self.current_player = parsed.turn;
        self.history.clear();
        self.emit_board_updated();
        Ok(())
    }

    /// Applies a move for the side to move. Returns false, without touching
    /// any state, when the session is not active or the move is invalid.
    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        if self.state != SessionState::Active {
            debug!("rejected move {from:?}->{to:?}: session is {:?}", self.state);
            return false;
        }
        if !is_valid_move(&self.board, self.current_player, from, to) {
            debug!(
                "rejected move {from:?}->{to:?} for {:?}",
                self.current_player
            );
            return false;
        }
        let Some(mv) = apply_move(&mut self.board, from, to) else {
            return false;
        };

        self.history.push(mv);
        self.current_player = self.current_player.opposite();
        debug!("applied {} ({} plies)", move_token(&mv), self.history.len());

        self.emit(GameEvent::MoveMade {
            board: self.board.clone(),
            current_player: self.current_player,
            last_move: mv,
        });
        self.finish_if_terminal(&mv);
        true
    }

    /// Raw-coordinate entry point shared by local, AI and remote moves.
    pub fn make_move_at(&mut self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool {
        match (Square::new(from_row, from_col), Square::new(to_row, to_col)) {
            (Some(from), Some(to)) => self.make_move(from, to),
            _ => {
                debug!("rejected move ({from_row},{from_col})->({to_row},{to_col}): off board");
                false
            }
        }
    }

    /// Takes back the last move while the game is still running.
    pub fn undo(&mut self) -> Option<Move> {
        if self.state != SessionState::Active {
            return None;
        }
        let mv = self.history.pop()?;
        self.board.set(mv.from, Some(mv.piece));
        self.board.set(mv.to, mv.captured);
        self.current_player = mv.piece.color;
        self.emit_board_updated();
        Some(mv)
    }

    /// Forces the game into the finished state. Returns false if it already is.
    pub fn end_game(&mut self, winner: Winner, reason: EndReason) -> bool {
        if self.state == SessionState::Finished {
            return false;
        }
        self.state = SessionState::Finished;
        self.result = Some(GameResult { winner, reason });
        info!(
            "game over: {:?} by {:?} after {} plies",
            winner,
            reason,
            self.history.len()
        );

        self.emit(GameEvent::GameEnd {
            winner,
            reason,
            history: self.history.clone(),
        });
        true
    }

    pub fn resign(&mut self, color: Color) -> bool {
        self.end_active(Winner::Side(color.opposite()), EndReason::Resignation)
    }

    pub fn timeout(&mut self, color: Color) -> bool {
        self.end_active(Winner::Side(color.opposite()), EndReason::Timeout)
    }

    pub fn agree_draw(&mut self) -> bool {
        self.end_active(Winner::Draw, EndReason::Draw)
    }

    pub fn pending_ai_turn(&self) -> Option<AiRequest> {
        let GameMode::Ai {
            ai_color,
            difficulty,
        } = self.mode
        else {
            return None;
        };
        if self.state != SessionState::Active || self.current_player != ai_color {
            return None;
        }
        Some(AiRequest {
            board: self.board.clone(),
            color: ai_color,
            difficulty,
            ply: self.history.len(),
        })
    }

    pub fn set_ai_thinking(&mut self, thinking: bool) {
        if let GameMode::Ai { difficulty, .. } = self.mode {
            self.emit(GameEvent::AiThinking {
                thinking,
                difficulty,
            });
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn fen(&self) -> String {
        encode_fen(&self.board, self.current_player)
    }

    pub fn export(&self) -> String {
        export_game(&self.history, self.result)
    }

    fn end_active(&mut self, winner: Winner, reason: EndReason) -> bool {
        self.state == SessionState::Active && self.end_game(winner, reason)
    }

    fn finish_if_terminal(&mut self, mv: &Move) {
        let mover = mv.piece.color;
        let defender = self.current_player;
        let general_taken = mv
            .captured
            .is_some_and(|piece| piece.kind == PieceKind::General);

        if general_taken || is_general_captured(&self.board, defender) {
            self.end_game(Winner::Side(mover), EndReason::Checkmate);
        } else if is_checkmate(&self.board, defender) {
            self.end_game(Winner::Side(mover), EndReason::Checkmate);
        } else if is_stalemate(&self.board, defender) {
            self.end_game(Winner::Draw, EndReason::Stalemate);
        }
    }

    fn emit_board_updated(&mut self) {
        self.emit(GameEvent::BoardUpdated {
            board: self.board.clone(),
            current_player: self.current_player,
        });
    }

    fn emit(&mut self, event: GameEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
