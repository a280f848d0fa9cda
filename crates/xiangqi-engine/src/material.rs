use xiangqi_core::{Board, Color, Evaluator, PieceKind, Score};

/// Fixed piece values. The General outweighs all other material combined.
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::General => 10_000,
        PieceKind::Chariot => 900,
        PieceKind::Cannon => 450,
        PieceKind::Horse => 400,
        PieceKind::Advisor => 200,
        PieceKind::Elephant => 200,
        PieceKind::Pawn => 100,
    }
}

/// Material balance from `color`'s point of view.
#[derive(Debug, Clone, Copy)]
pub struct MaterialEval;

impl MaterialEval {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MaterialEval {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for MaterialEval {
    fn evaluate(&self, board: &Board, color: Color) -> Score {
        let side = |c: Color| -> i32 {
            board
                .pieces(c)
                .map(|(_, piece)| piece_value(piece.kind))
                .sum()
        };
        Score(side(color) - side(color.opposite()))
    }
}
