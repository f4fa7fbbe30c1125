//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Counter, Field, Formula, Mode};
use crate::storage::LoadOptions;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Ranking defaults applied when a request does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Top-N bound when none is given
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Column to rank by
    #[serde(default)]
    pub sort_key: Field,

    /// Mode used for headline KPIs
    #[serde(default = "default_kpi_mode")]
    pub kpi_mode: Mode,

    /// Per-player ratio shown next to each ranked row
    #[serde(default = "default_metric")]
    pub metric: Formula,

    /// Counter summed per mode for the totals breakdown
    #[serde(default = "default_totals_counter")]
    pub totals_counter: Counter,

    /// Modes included in totals
    #[serde(default = "default_modes")]
    pub modes: Vec<Mode>,

    /// Columns the data source must provide
    #[serde(default = "default_required_columns")]
    pub required_columns: Vec<Field>,
}

fn default_top_n() -> usize {
    50
}

fn default_kpi_mode() -> Mode {
    Mode::Solo
}

fn default_metric() -> Formula {
    Formula::WinsPerHour(Mode::Solo)
}

fn default_totals_counter() -> Counter {
    Counter::Kills
}

fn default_modes() -> Vec<Mode> {
    Mode::ALL.to_vec()
}

fn default_required_columns() -> Vec<Field> {
    LoadOptions::default().required
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            sort_key: Field::default(),
            kpi_mode: default_kpi_mode(),
            metric: default_metric(),
            totals_counter: default_totals_counter(),
            modes: default_modes(),
            required_columns: default_required_columns(),
        }
    }
}

impl RankingConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            required: self.required_columns.clone(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./Fortnite_players_stats.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            log_level: default_log_level(),
            ranking: RankingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ranking.modes.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one mode must be configured for totals".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
