use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use xiangqi_core::{
    apply_move, generate_all_moves, generate_legal_moves, Board, Color, Difficulty, Evaluator,
    Move, Piece, Score, SearchLimits, SearchResult, Searcher, Square,
};

use crate::material::MaterialEval;

/// Bound used for "no line found". Never reached by material scores.
pub const SCORE_INFINITY: i32 = i32::MAX;

/// Fixed-depth, full-width negamax over material.
///
/// Every ply expands the moves of the side the search was started for, and
/// child scores are negated on the way up. Ties at the root keep the first
/// move in enumeration order. When no root move scores above
/// `-SCORE_INFINITY` a random legal move is played instead.
pub struct MinimaxSearcher {
    eval: Box<dyn Evaluator>,
    rng: StdRng,
    nodes: u64,
}

impl std::fmt::Debug for MinimaxSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinimaxSearcher")
            .field("eval", &"<Evaluator>")
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl MinimaxSearcher {
    pub fn new() -> Self {
        Self::with_eval(Box::new(MaterialEval::new()), StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_eval(Box::new(MaterialEval::new()), StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    pub fn with_eval(eval: Box<dyn Evaluator>, rng: StdRng) -> Self {
        Self { eval, rng, nodes: 0 }
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn choose_move(
        &mut self,
        board: &Board,
        color: Color,
        difficulty: Difficulty,
    ) -> Option<Move> {
        self.search_depth(board, color, difficulty.depth()).best_move
    }

    pub fn search_depth(&mut self, board: &Board, color: Color, depth: u8) -> SearchResult {
        let started = Instant::now();
        self.nodes = 0;
        let depth = depth.max(1);

        let mut best_move = None;
        let mut best_score = -SCORE_INFINITY;
        for mv in generate_all_moves(board, color) {
            let mut child = board.clone();
            let _ = apply_move(&mut child, mv.from, mv.to);
            self.nodes += 1;
            let score = self.evaluate_position(&child, depth - 1, color);
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }

        if best_move.is_none() {
            best_move = self.random_move(board, color);
            if let Some(mv) = best_move {
                debug!("no scored line for {color:?}, playing random {mv:?}");
            }
        }

        debug!(
            "depth {depth} search for {color:?}: score={best_score} nodes={} in {:?}",
            self.nodes,
            started.elapsed()
        );
        SearchResult {
            best_move,
            score: Score(best_score),
            nodes_searched: self.nodes,
        }
    }

    /// Static evaluation at depth 0. Otherwise the best negated child score
    /// over `color`'s moves, or `-SCORE_INFINITY` when it has none.
    pub fn evaluate_position(&mut self, board: &Board, depth: u8, color: Color) -> i32 {
        if depth == 0 {
            return self.eval.evaluate(board, color).0;
        }

        let mut best = -SCORE_INFINITY;
        for mv in generate_all_moves(board, color) {
            let mut child = board.clone();
            let _ = apply_move(&mut child, mv.from, mv.to);
            self.nodes += 1;
            let score = -self.evaluate_position(&child, depth - 1, color);
            best = best.max(score);
        }
        best
    }

    /// Shuffles `color`'s pieces and plays a random destination of the first
    /// one that can move.
    pub fn random_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let mut pieces: Vec<(Square, Piece)> = board.pieces(color).collect();
        pieces.shuffle(&mut self.rng);

        for (from, piece) in pieces {
            let targets = generate_legal_moves(board, from);
            if targets.is_empty() {
                continue;
            }
            let to = targets[self.rng.random_range(0..targets.len())];
            return Some(Move::new(from, to, piece, board.piece_at(to)));
        }
        None
    }
}

impl Default for MinimaxSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher for MinimaxSearcher {
    fn search(&mut self, board: &Board, color: Color, limits: SearchLimits) -> SearchResult {
        let depth = limits.depth.unwrap_or(Difficulty::default().depth());
        self.search_depth(board, color, depth)
    }
}
