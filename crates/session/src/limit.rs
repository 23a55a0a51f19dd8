//! Search limits for engine requests.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("give either a time or a depth, not both")]
    Both,
    #[error("give a time in seconds or a depth in plies")]
    Neither,
    #[error("time must be a positive number of seconds up to {max}, got {0}", max = MAX_MOVE_TIME.as_secs())]
    Time(String),
    #[error("depth must be a positive number of plies, got {0}")]
    Depth(String),
    #[error("unknown search limit {0:?}, expected time=<seconds> or depth=<plies>")]
    Unknown(String),
}

/// Longest time per move a [`SearchLimit`] accepts.
pub const MAX_MOVE_TIME: Duration = Duration::from_secs(24 * 60 * 60);

/// How long the engine may think about one move.
///
/// Configured as `{ time = 0.5 }` or `{ depth = 12 }`; the two are
/// interchangeable from the session's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LimitSpec", into = "LimitSpec")]
pub enum SearchLimit {
    /// Think for a fixed wall-clock time.
    Time(Duration),
    /// Search to a fixed depth in plies.
    Depth(u32),
}

impl SearchLimit {
    pub fn seconds(secs: f64) -> Result<Self, LimitError> {
        if secs.is_nan() || secs <= 0.0 || secs > MAX_MOVE_TIME.as_secs_f64() {
            return Err(LimitError::Time(secs.to_string()));
        }
        Duration::try_from_secs_f64(secs)
            .map(SearchLimit::Time)
            .map_err(|_| LimitError::Time(secs.to_string()))
    }

    pub fn depth(plies: u32) -> Result<Self, LimitError> {
        if plies == 0 {
            return Err(LimitError::Depth(plies.to_string()));
        }
        Ok(SearchLimit::Depth(plies))
    }

    /// The `go` command asking for a move under this limit.
    pub fn go_command(&self) -> String {
        match self {
            SearchLimit::Time(d) => format!("go movetime {}", d.as_millis().max(1)),
            SearchLimit::Depth(plies) => format!("go depth {plies}"),
        }
    }

    /// Longest wait for `bestmove` before the engine is declared hung.
    ///
    /// A time limit gets `slack` on top, a depth limit has no natural bound
    /// and uses `depth_ceiling`.
    pub fn protocol_timeout(&self, slack: Duration, depth_ceiling: Duration) -> Duration {
        match self {
            SearchLimit::Time(d) => d.saturating_add(slack),
            SearchLimit::Depth(_) => depth_ceiling,
        }
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        SearchLimit::Time(Duration::from_secs(1))
    }
}

impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLimit::Time(d) => write!(f, "time={}", d.as_secs_f64()),
            SearchLimit::Depth(plies) => write!(f, "depth={plies}"),
        }
    }
}

impl FromStr for SearchLimit {
    type Err = LimitError;

    /// Accepts `time=0.5`, `time:0.5`, `time 0.5` and the same for `depth`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (key, value) = s
            .split_once(['=', ':', ' '])
            .ok_or_else(|| LimitError::Unknown(s.to_string()))?;
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "time" | "movetime" | "t" => {
                let secs: f64 = value
                    .parse()
                    .map_err(|_| LimitError::Time(value.to_string()))?;
                SearchLimit::seconds(secs)
            }
            "depth" | "d" => {
                let plies: u32 = value
                    .parse()
                    .map_err(|_| LimitError::Depth(value.to_string()))?;
                SearchLimit::depth(plies)
            }
            _ => Err(LimitError::Unknown(s.to_string())),
        }
    }
}

/// Wire form of [`SearchLimit`] in configuration files.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl TryFrom<LimitSpec> for SearchLimit {
    type Error = LimitError;

    fn try_from(form: LimitSpec) -> Result<Self, Self::Error> {
        match (form.time, form.depth) {
            (Some(_), Some(_)) => Err(LimitError::Both),
            (None, None) => Err(LimitError::Neither),
            (Some(secs), None) => SearchLimit::seconds(secs),
            (None, Some(plies)) => SearchLimit::depth(plies),
        }
    }
}

impl From<SearchLimit> for LimitSpec {
    fn from(limit: SearchLimit) -> Self {
        match limit {
            SearchLimit::Time(d) => LimitSpec {
                time: Some(d.as_secs_f64()),
                depth: None,
            },
            SearchLimit::Depth(plies) => LimitSpec {
                time: None,
                depth: Some(plies),
            },
        }
    }
}

#[cfg(test)]
#[path = "limit_tests.rs"]
mod limit_tests;
