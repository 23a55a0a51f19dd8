//! Session configuration, loaded from TOML.
//!
//! ```toml
//! show_hints = false
//!
//! [engine]
//! path = "/usr/local/bin/stockfish"
//! handshake_timeout_ms = 5000
//!
//! [engine.options]
//! Threads = "2"
//!
//! [limit]
//! time = 0.5
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::engine::{EngineBackend, EngineLauncher, UciEngine};
use crate::error::StartError;
use crate::limit::SearchLimit;
use crate::session::GameSession;

pub const DEFAULT_ENGINE_PATH: &str = "stockfish-ubuntu-x86-64-avx2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    /// Limit used when an engine request does not name one.
    pub limit: SearchLimit,
    /// Print the engine's suggestion after every move.
    pub show_hints: bool,
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SessionConfig = text.parse()?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()
    }

    /// A fresh session wired to the configured engine, launched lazily.
    pub fn build_session(&self) -> GameSession {
        if self.engine.enabled {
            GameSession::with_launcher(Box::new(self.engine.clone()))
        } else {
            GameSession::new()
        }
    }
}

impl std::str::FromStr for SessionConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: SessionConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// Upper bound for every engine timeout setting: one day.
pub const MAX_TIMEOUT_MS: u64 = 24 * 60 * 60 * 1000;

/// How to find, start and talk to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// When false the session is human-only.
    pub enabled: bool,
    pub path: PathBuf,
    pub args: Vec<String>,
    /// Add execute permission to `path` before launching.
    pub ensure_executable: bool,
    pub handshake_timeout_ms: u64,
    /// Extra time on top of a time limit before the engine is declared hung.
    pub timeout_slack_ms: u64,
    /// Wait ceiling for depth-limited searches.
    pub depth_timeout_ms: u64,
    /// Sent as `setoption name <key> value <value>` after the handshake.
    pub options: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(DEFAULT_ENGINE_PATH),
            args: Vec::new(),
            ensure_executable: true,
            handshake_timeout_ms: 5_000,
            timeout_slack_ms: 2_000,
            depth_timeout_ms: 60_000,
            options: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn timeout_slack(&self) -> Duration {
        Duration::from_millis(self.timeout_slack_ms)
    }

    pub fn depth_timeout(&self) -> Duration {
        Duration::from_millis(self.depth_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("engine.path is empty".to_string()));
        }
        for (key, value) in [
            ("handshake_timeout_ms", self.handshake_timeout_ms),
            ("timeout_slack_ms", self.timeout_slack_ms),
            ("depth_timeout_ms", self.depth_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("engine.{key} must be positive")));
            }
            if value > MAX_TIMEOUT_MS {
                return Err(ConfigError::Invalid(format!(
                    "engine.{key} must be at most {MAX_TIMEOUT_MS}"
                )));
            }
        }
        if let Some(name) = self.options.keys().find(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("engine option {name:?} has no name")));
        }
        Ok(())
    }
}

impl EngineLauncher for EngineConfig {
    fn launch(&self) -> Result<Box<dyn EngineBackend>, StartError> {
        Ok(Box::new(UciEngine::start(self)?))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
