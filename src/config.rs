use std::path::Path;

use crate::ai::MonteCarloConfig;
use crate::error::ConfigError;
use crate::game::{validate_shape, Player};

/// Board shape and win rules.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub columns: usize,
    /// Clamped to max(rows, columns) when the board is built
    pub win_length: usize,
    pub allow_diagonal: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: 4,
            columns: 4,
            win_length: 4,
            allow_diagonal: true,
        }
    }
}

/// Which side the human plays and who opens.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    pub human_player: Player,
    pub first_player: Player,
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig {
            human_player: Player::A,
            first_player: Player::A,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub selector: MonteCarloConfig,
    pub play: PlayConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shape(self.board.rows, self.board.columns, self.board.win_length).map_err(
            |e| match e {
                ConfigError::InvalidConfiguration(msg) => {
                    ConfigError::InvalidConfiguration(format!("board.{msg}"))
                }
                other => other,
            },
        )?;

        if self.selector.batch_size == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "selector.batch_size must be > 0".into(),
            ));
        }
        if self.selector.time_budget_ms == Some(0) {
            return Err(ConfigError::InvalidConfiguration(
                "selector.time_budget_ms must be > 0 when set".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
