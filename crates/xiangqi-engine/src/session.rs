//! Serialized access to a [`GameSession`] shared by human, remote and AI
//! producers.
//!
//! One actor thread owns the session. Callers talk to it through a cloneable
//! [`SessionHandle`]; every call is a command plus a one-shot reply channel.
//! When the AI is to move the actor starts a search on the [`AiService`] and
//! keeps serving commands. The finished search is fed back to the actor on a
//! separate channel and applied with the same `make_move` used for humans.
//!
//! Human moves are refused while a search is in flight. Anything that resets
//! the game (init, load, undo, end) abandons the search, and its late result
//! is dropped by ticket. Against the AI, undo takes back a full turn.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, select, unbounded, Receiver, Sender};
use log::{debug, info, warn};
use thiserror::Error;
use xiangqi_core::{
    Color, EndReason, FenError, GameEvent, GameMode, GameResult, GameSession, Move, SessionState,
    Square, Winner,
};

use crate::config::EngineConfig;
use crate::service::{AiOutcome, AiService};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("session driver is not running")]
    Disconnected,
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error("failed to start session thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("session thread panicked")]
    Panicked,
}

/// Point-in-time view of the session, for callers that need more than one
/// field consistently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub fen: String,
    pub state: SessionState,
    pub current_player: Color,
    pub plies: usize,
    pub result: Option<GameResult>,
    pub ai_thinking: bool,
}

enum Command {
    InitGame {
        mode: GameMode,
        fen: Option<String>,
        reply: Sender<Result<(), FenError>>,
    },
    MakeMove {
        from: Square,
        to: Square,
        reply: Sender<bool>,
    },
    MakeMoveAt {
        coords: [u8; 4],
        reply: Sender<bool>,
    },
    EndGame {
        winner: Winner,
        reason: EndReason,
        reply: Sender<bool>,
    },
    Resign {
        color: Color,
        reply: Sender<bool>,
    },
    LoadFen {
        fen: String,
        reply: Sender<Result<(), FenError>>,
    },
    Undo {
        reply: Sender<Option<Move>>,
    },
    Fen {
        reply: Sender<String>,
    },
    Export {
        reply: Sender<String>,
    },
    Snapshot {
        reply: Sender<Snapshot>,
    },
    Subscribe {
        reply: Sender<Receiver<GameEvent>>,
    },
    Shutdown,
}

struct AiReply {
    ticket: u64,
    ply: usize,
    outcome: AiOutcome,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: u64,
    ply: usize,
}

struct Actor {
    session: GameSession,
    service: AiService,
    ai_tx: Sender<AiReply>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl Actor {
    fn run(mut self, commands: Receiver<Command>, ai_results: Receiver<AiReply>) {
        loop {
            select! {
                recv(commands) -> cmd => match cmd {
                    Ok(Command::Shutdown) | Err(_) => break,
                    Ok(cmd) => self.handle(cmd),
                },
                recv(ai_results) -> reply => {
                    if let Ok(reply) = reply {
                        self.apply_ai_reply(reply);
                    }
                }
            }
        }
        debug!("session driver stopped");
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::InitGame { mode, fen, reply } => {
                self.abandon_search();
                let result = self.session.init_game(mode, fen.as_deref());
                let _ = reply.send(result);
                self.schedule_ai();
            }
            Command::MakeMove { from, to, reply } => {
                let applied = self.human_move(|session| session.make_move(from, to));
                let _ = reply.send(applied);
            }
            Command::MakeMoveAt { coords, reply } => {
                let [fr, fc, tr, tc] = coords;
                let applied = self.human_move(|session| session.make_move_at(fr, fc, tr, tc));
                let _ = reply.send(applied);
            }
            Command::EndGame {
                winner,
                reason,
                reply,
            } => {
                self.abandon_search();
                let _ = reply.send(self.session.end_game(winner, reason));
            }
            Command::Resign { color, reply } => {
                self.abandon_search();
                let _ = reply.send(self.session.resign(color));
            }
            Command::LoadFen { fen, reply } => {
                self.abandon_search();
                let result = self.session.load_fen(&fen);
                let _ = reply.send(result);
                self.schedule_ai();
            }
            Command::Undo { reply } => {
                self.abandon_search();
                let undone = self.undo_turn();
                let _ = reply.send(undone);
                self.schedule_ai();
            }
            Command::Fen { reply } => {
                let _ = reply.send(self.session.fen());
            }
            Command::Export { reply } => {
                let _ = reply.send(self.session.export());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Subscribe { reply } => {
                let _ = reply.send(self.session.subscribe());
            }
            Command::Shutdown => {}
        }
    }

    fn human_move(&mut self, apply: impl FnOnce(&mut GameSession) -> bool) -> bool {
        if self.in_flight.is_some() {
            debug!("rejected move while the AI is thinking");
            return false;
        }
        let applied = apply(&mut self.session);
        if applied {
            self.schedule_ai();
        }
        applied
    }

    fn schedule_ai(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        let Some(request) = self.session.pending_ai_turn() else {
            return;
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let ply = request.ply;
        let tx = self.ai_tx.clone();

        self.session.set_ai_thinking(true);
        let spawned = self.service.choose_move_with(
            request.board,
            request.color,
            request.difficulty,
            move |outcome| {
                let _ = tx.send(AiReply {
                    ticket,
                    ply,
                    outcome,
                });
            },
        );
        match spawned {
            Ok(()) => self.in_flight = Some(InFlight { ticket, ply }),
            Err(err) => {
                warn!("could not start AI search: {err}");
                self.session.set_ai_thinking(false);
            }
        }
    }

    /// Against the AI, takes back the AI's reply together with the human move
    /// before it, so the human is to move again. Returns the human move, or
    /// `None` when only AI moves are on the record.
    fn undo_turn(&mut self) -> Option<Move> {
        let GameMode::Ai { ai_color, .. } = self.session.mode() else {
            return self.session.undo();
        };
        let history = self.session.history();
        let last = *history.last()?;
        if last.piece.color == ai_color {
            if history.len() < 2 {
                return None;
            }
            self.session.undo()?;
        }
        self.session.undo()
    }

    fn abandon_search(&mut self) {
        if let Some(search) = self.in_flight.take() {
            debug!("abandoning AI search {}", search.ticket);
            self.session.set_ai_thinking(false);
        }
    }

    fn apply_ai_reply(&mut self, reply: AiReply) {
        let current = match self.in_flight {
            Some(search) if search.ticket == reply.ticket => search,
            _ => {
                warn!("discarding stale AI result for ticket {}", reply.ticket);
                return;
            }
        };
        self.in_flight = None;

        if current.ply != reply.ply || self.session.history().len() != reply.ply {
            warn!(
                "discarding AI result computed at ply {} (session at {})",
                reply.ply,
                self.session.history().len()
            );
        } else {
            match reply.outcome.mv {
                Some(mv) if self.session.make_move(mv.from, mv.to) => {
                    debug!(
                        "AI played {mv:?} after {:?} ({} nodes)",
                        reply.outcome.elapsed, reply.outcome.nodes
                    );
                }
                Some(mv) => warn!("session rejected AI move {mv:?}"),
                None => warn!("AI found no move"),
            }
        }
        self.session.set_ai_thinking(false);
        self.schedule_ai();
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            fen: self.session.fen(),
            state: self.session.state(),
            current_player: self.session.current_player(),
            plies: self.session.history().len(),
            result: self.session.result(),
            ai_thinking: self.in_flight.is_some(),
        }
    }
}

/// Owns the actor thread. The thread also stops once the driver and every
/// [`SessionHandle`] have been dropped.
#[derive(Debug)]
pub struct SessionDriver {
    handle: SessionHandle,
    thread: JoinHandle<()>,
}

impl SessionDriver {
    pub fn spawn(config: EngineConfig) -> Result<Self, DriverError> {
        let (commands_tx, commands_rx) = unbounded();
        let (ai_tx, ai_rx) = unbounded();
        let actor = Actor {
            session: GameSession::new(),
            service: AiService::new(config),
            ai_tx,
            in_flight: None,
            next_ticket: 0,
        };
        let thread = thread::Builder::new()
            .name("xiangqi-session".to_string())
            .spawn(move || actor.run(commands_rx, ai_rx))?;
        info!("session driver started");

        Ok(Self {
            handle: SessionHandle {
                commands: commands_tx,
            },
            thread,
        })
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn shutdown(self) -> Result<(), DriverError> {
        let _ = self.handle.commands.send(Command::Shutdown);
        self.thread.join().map_err(|_| DriverError::Panicked)
    }
}

#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: Sender<Command>,
}

impl SessionHandle {
    pub fn init_game(&self, mode: GameMode, fen: Option<&str>) -> Result<(), DriverError> {
        let fen = fen.map(str::to_string);
        self.request(|reply| Command::InitGame { mode, fen, reply })??;
        Ok(())
    }

    pub fn make_move(&self, from: Square, to: Square) -> Result<bool, DriverError> {
        self.request(|reply| Command::MakeMove { from, to, reply })
    }

    pub fn make_move_at(
        &self,
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    ) -> Result<bool, DriverError> {
        let coords = [from_row, from_col, to_row, to_col];
        self.request(|reply| Command::MakeMoveAt { coords, reply })
    }

    pub fn end_game(&self, winner: Winner, reason: EndReason) -> Result<bool, DriverError> {
        self.request(|reply| Command::EndGame {
            winner,
            reason,
            reply,
        })
    }

    pub fn resign(&self, color: Color) -> Result<bool, DriverError> {
        self.request(|reply| Command::Resign { color, reply })
    }

    pub fn load_fen(&self, fen: &str) -> Result<(), DriverError> {
        let fen = fen.to_string();
        self.request(|reply| Command::LoadFen { fen, reply })??;
        Ok(())
    }

    pub fn undo(&self) -> Result<Option<Move>, DriverError> {
        self.request(|reply| Command::Undo { reply })
    }

    pub fn fen(&self) -> Result<String, DriverError> {
        self.request(|reply| Command::Fen { reply })
    }

    pub fn export(&self) -> Result<String, DriverError> {
        self.request(|reply| Command::Export { reply })
    }

    pub fn snapshot(&self) -> Result<Snapshot, DriverError> {
        self.request(|reply| Command::Snapshot { reply })
    }

    pub fn subscribe(&self) -> Result<Receiver<GameEvent>, DriverError> {
        self.request(|reply| Command::Subscribe { reply })
    }

    fn request<T>(&self, build: impl FnOnce(Sender<T>) -> Command) -> Result<T, DriverError> {
        let (tx, rx) = bounded(1);
        self.commands
            .send(build(tx))
            .map_err(|_| DriverError::Disconnected)?;
        rx.recv().map_err(|_| DriverError::Disconnected)
    }
}
