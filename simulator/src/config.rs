use arcade_execution::EngineConfig;
use arcade_types::{
    casino::{HISTORY_CAPACITY, STARTING_BALANCE, WAGER_CHOICES},
    Seed,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr};
use thiserror::Error;
use tracing::Level;

/// Configuration for an arcade session, loaded from YAML.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Session seed; drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Empty allows any positive wager.
    #[serde(default = "default_allowed_wagers")]
    pub allowed_wagers: Vec<u64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
}

fn default_starting_balance() -> u64 {
    STARTING_BALANCE
}

fn default_history_capacity() -> usize {
    HISTORY_CAPACITY
}

fn default_allowed_wagers() -> Vec<u64> {
    WAGER_CHOICES.to_vec()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            starting_balance: default_starting_balance(),
            history_capacity: default_history_capacity(),
            allowed_wagers: default_allowed_wagers(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn log_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
            value: self.log_level.clone(),
        })
    }

    /// Seed to play with, drawing one if none is configured.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn engine_config(&self, seed: u64) -> Result<EngineConfig, ConfigError> {
        if self.starting_balance == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "starting_balance",
                value: 0,
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "history_capacity",
                value: 0,
            });
        }
        Ok(EngineConfig {
            seed: Seed::from_u64(seed),
            starting_balance: self.starting_balance,
            history_capacity: self.history_capacity,
            allowed_wagers: self.allowed_wagers.clone(),
        })
    }
}
