use serde::Serialize;

use crate::board::Board;
use crate::types::{Color, Difficulty, EndReason, GameMode, Move, Winner};

/// Everything a UI or network collaborator needs to follow a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    #[serde(rename_all = "camelCase")]
    GameInit {
        game_mode: GameMode,
        board: Board,
        current_player: Color,
    },
    #[serde(rename_all = "camelCase")]
    MoveMade {
        board: Board,
        current_player: Color,
        last_move: Move,
    },
    #[serde(rename_all = "camelCase")]
    BoardUpdated {
        board: Board,
        current_player: Color,
    },
    #[serde(rename_all = "camelCase")]
    GameEnd {
        winner: Winner,
        reason: EndReason,
        history: Vec<Move>,
    },
    #[serde(rename_all = "camelCase")]
    AiThinking {
        thinking: bool,
        difficulty: Difficulty,
    },
}
