//! Runtime configuration, read from environment variables.
//!
//! A `.env` file is loaded by `main` before this runs. Blank values fall back
//! to the defaults.

use crate::error::ConfigError;
use crate::leaderboard::DEFAULT_CAPACITY;
use crate::types::DelayRange;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const BIND_VAR: &str = "REACTION_BIND";
pub const POLL_MS_VAR: &str = "REACTION_POLL_MS";
pub const DELAY_MIN_VAR: &str = "REACTION_DELAY_MIN_MS";
pub const DELAY_MAX_VAR: &str = "REACTION_DELAY_MAX_MS";
pub const LEADERBOARD_SIZE_VAR: &str = "REACTION_LEADERBOARD_SIZE";
pub const BROADCAST_CAPACITY_VAR: &str = "REACTION_BROADCAST_CAPACITY";
pub const STATIC_DIR_VAR: &str = "REACTION_STATIC_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind: SocketAddr,
    /// Period of the trigger polling loop
    pub poll_interval: Duration,
    pub delay: DelayRange,
    pub leaderboard_size: usize,
    /// Events buffered per viewer before a slow viewer starts missing them
    pub broadcast_capacity: usize,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            poll_interval: Duration::from_millis(1),
            delay: DelayRange::default(),
            leaderboard_size: DEFAULT_CAPACITY,
            broadcast_capacity: 100,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    /// Load config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind = parse_var(&lookup, BIND_VAR)?.unwrap_or(defaults.bind);

        let poll_ms: u64 = parse_var(&lookup, POLL_MS_VAR)?
            .unwrap_or(defaults.poll_interval.as_millis() as u64);
        if poll_ms == 0 {
            return Err(ConfigError::Zero { key: POLL_MS_VAR });
        }

        let min = parse_var(&lookup, DELAY_MIN_VAR)?.unwrap_or(defaults.delay.min);
        let max = parse_var(&lookup, DELAY_MAX_VAR)?.unwrap_or(defaults.delay.max);
        if min > max {
            return Err(ConfigError::InvalidDelayRange { min, max });
        }

        let leaderboard_size =
            parse_var(&lookup, LEADERBOARD_SIZE_VAR)?.unwrap_or(defaults.leaderboard_size);
        if leaderboard_size == 0 {
            return Err(ConfigError::Zero {
                key: LEADERBOARD_SIZE_VAR,
            });
        }

        let broadcast_capacity =
            parse_var(&lookup, BROADCAST_CAPACITY_VAR)?.unwrap_or(defaults.broadcast_capacity);
        if broadcast_capacity == 0 {
            return Err(ConfigError::Zero {
                key: BROADCAST_CAPACITY_VAR,
            });
        }

        let static_dir = read_var(&lookup, STATIC_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Ok(Self {
            bind,
            poll_interval: Duration::from_millis(poll_ms),
            delay: DelayRange { min, max },
            leaderboard_size,
            broadcast_capacity,
            static_dir,
        })
    }
}

/// Trimmed, non-empty value of a variable
fn read_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match read_var(lookup, key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(None),
    }
}
