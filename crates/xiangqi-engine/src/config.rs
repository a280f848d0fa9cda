use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xiangqi_core::Difficulty;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Minimum wall-clock time the AI appears to think before its move is
/// released, per difficulty. Pacing only; search depth is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinkTimes {
    pub easy_ms: u64,
    pub medium_ms: u64,
    pub hard_ms: u64,
}

impl ThinkTimes {
    pub const NONE: Self = Self {
        easy_ms: 0,
        medium_ms: 0,
        hard_ms: 0,
    };

    pub fn floor(&self, difficulty: Difficulty) -> Duration {
        let ms = match difficulty {
            Difficulty::Easy => self.easy_ms,
            Difficulty::Medium => self.medium_ms,
            Difficulty::Hard => self.hard_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for ThinkTimes {
    fn default() -> Self {
        Self {
            easy_ms: 500,
            medium_ms: 1_000,
            hard_ms: 1_500,
        }
    }
}

/// Engine settings. Every field has a default, so an empty file is valid:
///
/// ```toml
/// seed = 7
///
/// [think_times]
/// easy_ms = 0
/// hard_ms = 2000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub think_times: ThinkTimes,
    /// Seeds the fallback move picker. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// No pacing delay. Used by tooling and tests.
    pub fn instant() -> Self {
        Self {
            think_times: ThinkTimes::NONE,
            seed: None,
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}
