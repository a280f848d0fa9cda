use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, Receiver};
use log::debug;
use xiangqi_core::{Board, Color, Difficulty, Move};

use crate::config::EngineConfig;
use crate::minimax::MinimaxSearcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiOutcome {
    pub mv: Option<Move>,
    pub elapsed: Duration,
    pub nodes: u64,
}

/// Runs searches off the caller's thread. Each request gets its own board
/// copy and searcher, so nothing is shared with the live session.
#[derive(Debug)]
pub struct AiService {
    config: EngineConfig,
    requests: AtomicU64,
}

impl AiService {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            requests: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Searches on a worker thread and delivers the outcome on the returned
    /// channel once the difficulty's thinking-time floor has passed.
    pub fn choose_move_async(
        &self,
        board: Board,
        color: Color,
        difficulty: Difficulty,
    ) -> io::Result<Receiver<AiOutcome>> {
        let (tx, rx) = bounded(1);
        self.choose_move_with(board, color, difficulty, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        Ok(rx)
    }

    /// Like [`Self::choose_move_async`] but hands the outcome to `on_done` on
    /// the worker thread.
    pub fn choose_move_with<F>(
        &self,
        board: Board,
        color: Color,
        difficulty: Difficulty,
        on_done: F,
    ) -> io::Result<()>
    where
        F: FnOnce(AiOutcome) + Send + 'static,
    {
        let floor = self.config.think_times.floor(difficulty);
        let seed = self.next_seed();
        thread::Builder::new()
            .name("xiangqi-ai".to_string())
            .spawn(move || {
                let started = Instant::now();
                let mut searcher = MinimaxSearcher::from_seed(seed);
                let mv = searcher.choose_move(&board, color, difficulty);
                let nodes = searcher.nodes();

                if let Some(rest) = floor.checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
                let outcome = AiOutcome {
                    mv,
                    elapsed: started.elapsed(),
                    nodes,
                };
                debug!("{color:?} {difficulty:?} search finished: {outcome:?}");
                on_done(outcome);
            })?;
        Ok(())
    }

    /// Searches on the calling thread with no pacing delay.
    pub fn choose_move_blocking(
        &self,
        board: &Board,
        color: Color,
        difficulty: Difficulty,
    ) -> AiOutcome {
        let started = Instant::now();
        let mut searcher = MinimaxSearcher::from_seed(self.next_seed());
        let mv = searcher.choose_move(board, color, difficulty);
        AiOutcome {
            mv,
            elapsed: started.elapsed(),
            nodes: searcher.nodes(),
        }
    }

    /// Distinct but reproducible seed per request when a base seed is set.
    fn next_seed(&self) -> Option<u64> {
        let n = self.requests.fetch_add(1, Ordering::Relaxed);
        self.config.seed.map(|base| base.wrapping_add(n))
    }
}

impl Default for AiService {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
