//! Configuration handling
//!
//! Configuration is stored in `~/.config/clue-sheet/config.toml` (or the
//! platform equivalent) and may be pointed elsewhere with `--config`.
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

use crate::domain::DEFAULT_PLAYERS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the sheet is saved (defaults to the platform data directory)
    pub state_file: Option<PathBuf>,

    /// Column names for a fresh sheet
    pub default_players: Vec<String>,

    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Tracing level when neither `--verbose` nor `RUST_LOG` is given
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: None,
            default_players: DEFAULT_PLAYERS.iter().map(|s| s.to_string()).collect(),
            default_format: OutputFormat::Text,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load config: {}", config_path.display()))
    }

    /// Parses and validates TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_players.is_empty() {
            return Err(ConfigError::Invalid(
                "default_players must name at least one player".to_string(),
            ));
        }
        if self.default_players.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "default_players must not contain blank names".to_string(),
            ));
        }
        if self.level().is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "clue-sheet", "clue-sheet")
    }

    /// Returns the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the default location of the saved sheet
    pub fn default_state_file() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("sheet.json"))
    }

    /// Resolves the sheet path: explicit override, then config, then the
    /// platform data directory
    pub fn state_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        explicit
            .or_else(|| self.state_file.clone())
            .or_else(Self::default_state_file)
            .ok_or_else(|| anyhow::anyhow!("Could not determine where to save the sheet; pass --state"))
    }

    /// Parsed `log_level`
    pub fn level(&self) -> Option<Level> {
        match self.log_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.default_players, vec!["You", "Player 2", "Player 3"]);
        assert_eq!(config.default_format, OutputFormat::Text);
        assert_eq!(config.level(), Some(Level::WARN));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
default_players = ["Ada", "Grace"]
default_format = "json"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.default_players, vec!["Ada", "Grace"]);
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.state_file, None);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn empty_player_list_is_invalid() {
        let err = Config::parse("default_players = []").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn bad_log_level_is_invalid() {
        assert!(Config::parse("log_level = \"loud\"").is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse("default_players = [").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "state_file = \"/tmp/sheet.json\"\n\
             default_players = [\"Solo\"]\n\
             default_format = \"json\"\n\
             log_level = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(
            config,
            Config {
                state_file: Some(PathBuf::from("/tmp/sheet.json")),
                default_players: vec!["Solo".to_string()],
                default_format: OutputFormat::Json,
                log_level: "debug".to_string(),
            }
        );
    }

    #[test]
    fn state_path_precedence() {
        let config = Config {
            state_file: Some(PathBuf::from("/from/config.json")),
            ..Config::default()
        };
        assert_eq!(
            config.state_path(Some(PathBuf::from("/from/flag.json"))).unwrap(),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(
            config.state_path(None).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }
}
