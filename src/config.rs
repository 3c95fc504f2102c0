use crate::core::{Result, TutorError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Database file used when neither the config file nor the command line names one.
pub const DEFAULT_DATABASE_PATH: &str = "tutoring.db";

/// Log level used when the config file does not set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    pub logging: Option<LoggingConfig>,
}

/// Store-related configuration.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl Config {
    /// Database file to open, falling back to [`DEFAULT_DATABASE_PATH`].
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_ref()
            .and_then(|db| db.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    /// Maximum log level, falling back to [`DEFAULT_LOG_LEVEL`].
    pub fn log_level(&self) -> Result<Level> {
        let level = self
            .logging
            .as_ref()
            .and_then(|logging| logging.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL);
        level
            .parse::<Level>()
            .map_err(|_| TutorError::Config(format!("Unknown log level: '{}'", level)))
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| TutorError::Config(e.to_string()))
}

/// Loads configuration from a TOML file at the given path.
///
/// # Arguments
///
/// * `path` - The file path to the TOML configuration file.
///
/// # Example
///
/// ```no_run
/// let config = tutorpal::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| TutorError::Config(format!("{}: {}", path.display(), e)))?;
    parse_config(&content)
}

/// `<user config dir>/tutorpal/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tutorpal").join("config.toml"))
}

/// Loads the explicit config file if given, else the default one if it exists,
/// else returns the built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None => match default_config_path() {
            Some(path) if path.is_file() => load_config(path),
            _ => Ok(Config::default()),
        },
    }
}
