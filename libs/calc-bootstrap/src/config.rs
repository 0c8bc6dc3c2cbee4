//! Layered application configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. YAML file (if provided)
//! 3. environment variables prefixed with `CALC__` (`__` separates nesting levels,
//!    e.g. `CALC__SERVER__LISTEN_ADDR`)
//! 4. CLI overrides

use std::path::{Path, PathBuf};

use calc_transport_grpc::{DEFAULT_LISTEN_ADDR, ListenConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CALC__";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
    #[error("invalid server.listen_addr '{addr}': {reason}")]
    InvalidListenAddr { addr: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port` or `uds:///path/to/socket`.
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            ansi: true,
        }
    }
}

/// Overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub listen: Option<String>,
    pub verbose: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then `CALC__*` env vars.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingFile` if `path` is given but is not a file,
    /// and `ConfigError::Invalid` if any layer fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(listen) = &overrides.listen {
            self.server.listen_addr.clone_from(listen);
        }
        if let Some(level) = verbosity_level(overrides.verbose) {
            self.logging.level = level.to_owned();
        }
    }

    /// Parse `server.listen_addr`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidListenAddr` if the address is malformed or
    /// unsupported on this platform.
    pub fn listen_config(&self) -> Result<ListenConfig, ConfigError> {
        self.server
            .listen_addr
            .parse::<ListenConfig>()
            .map_err(|e: anyhow::Error| ConfigError::InvalidListenAddr {
                addr: self.server.listen_addr.clone(),
                reason: format!("{e:#}"),
            })
    }

    /// Render the effective configuration as pretty JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Map a `-v` count to a log level (`-v` info, `-vv` debug, `-vvv` trace).
#[must_use]
pub fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
