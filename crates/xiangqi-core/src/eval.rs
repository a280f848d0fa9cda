use crate::board::Board;
use crate::types::{Color, Score};

/// Static evaluation from the point of view of `color`.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board, color: Color) -> Score;
}
