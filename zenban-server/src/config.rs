//! Configuration for the Zenban server.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/zenban/config.toml`)
//! 4. Compiled defaults

use std::path::{Path, PathBuf};

/// Errors that can occur when loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The log file path does not name a file.
    #[error("log file path {0} does not name a file")]
    LogFileName(PathBuf),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerConfigFile {
    server: ServerSection,
    logging: LoggingSection,
}

/// `[server]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerSection {
    bind_addr: Option<String>,
    seed_demo_board: Option<bool>,
}

/// `[logging]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LoggingSection {
    level: Option<String>,
    file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the Zenban server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Zenban kanban board API server")]
pub struct ServerCliArgs {
    /// Address to bind the API server to.
    #[arg(short, long, env = "ZENBAN_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/zenban/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start with an empty board instead of the demo board.
    #[arg(long)]
    pub no_seed: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "ZENBAN_LOG")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stdout.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the server to (e.g., `0.0.0.0:27001`).
    pub bind_addr: String,
    /// Whether to start from the demo board.
    pub seed_demo_board: bool,
    /// Log level filter string.
    pub log_level: String,
    /// Log file; `None` logs to stdout.
    pub log_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:27001".to_string(),
            seed_demo_board: true,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// Otherwise the default path is tried and a missing file is treated as
    /// empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read or
    /// parsed, or if the explicit config file is missing.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        let config = Self::resolve(cli, &file);
        config.validate()?;
        Ok(config)
    }

    /// Directory and file name of the log file, if one is configured.
    #[must_use]
    pub fn log_file_parts(&self) -> Option<(&Path, &std::ffi::OsStr)> {
        let path = self.log_file.as_deref()?;
        Some((path.parent()?, path.file_name()?))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match &self.log_file {
            Some(path) if self.log_file_parts().is_none() => Err(ConfigError::LogFileName(path.clone())),
            _ => Ok(()),
        }
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &ServerCliArgs, file: &ServerConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            seed_demo_board: !cli.no_seed
                && file
                    .server
                    .seed_demo_board
                    .unwrap_or(defaults.seed_demo_board),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| file.logging.level.clone())
                .unwrap_or(defaults.log_level),
            log_file: cli.log_file.clone().or_else(|| file.logging.file.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn load_config_file(explicit_path: Option<&Path>) -> Result<ServerConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ServerConfigFile::default());
    };
    let path = config_dir.join("zenban").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
