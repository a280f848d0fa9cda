pub mod config;
pub mod material;
pub mod minimax;
pub mod service;
pub mod session;

pub use config::{ConfigError, EngineConfig, ThinkTimes};
pub use material::{piece_value, MaterialEval};
pub use minimax::{MinimaxSearcher, SCORE_INFINITY};
pub use service::{AiOutcome, AiService};
pub use session::{DriverError, SessionDriver, SessionHandle, Snapshot};
