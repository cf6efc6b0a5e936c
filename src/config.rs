//! Configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. `DVC_API_*` environment variables
//! 4. command-line flags (applied by the binary)
//!
//! # Example YAML configuration
//!
//! ```yaml
//! server:
//!   bind: "0.0.0.0"
//!   port: 8000
//!
//! dvc:
//!   repo_dir: /srv/ml-project
//!   binary: dvc
//!   primary_params_file: dvclive/params.yaml
//!   fallback_params_file: params.yaml
//!   command_timeout_secs: 120
//!
//! logging:
//!   level: info
//!   format: pretty
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::repository::{DvcRepository, DEFAULT_FALLBACK_PARAMS_FILE, DEFAULT_PRIMARY_PARAMS_FILE};
use crate::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// DVC invocation settings
    pub dvc: DvcConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind: String,

    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// DVC configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DvcConfig {
    /// Repository (and workspace) directory the commands run in
    pub repo_dir: PathBuf,

    /// `dvc` executable
    pub binary: PathBuf,

    /// Preferred parameter file
    pub primary_params_file: String,

    /// Parameter file used when the preferred one is absent
    pub fallback_params_file: String,

    /// Kill commands running longer than this; unset waits forever
    pub command_timeout_secs: Option<u64>,
}

impl Default for DvcConfig {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("."),
            binary: PathBuf::from("dvc"),
            primary_params_file: DEFAULT_PRIMARY_PARAMS_FILE.to_string(),
            fallback_params_file: DEFAULT_FALLBACK_PARAMS_FILE.to_string(),
            command_timeout_secs: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it is not valid YAML for this structure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on invalid YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply `DVC_API_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a numeric variable does not parse.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(std::env::vars())
    }

    /// Apply `DVC_API_*` variables from `vars`.
    ///
    /// Recognised: `BIND`, `PORT`, `REPO_DIR`, `DVC_BIN`, `PRIMARY_PARAMS_FILE`,
    /// `FALLBACK_PARAMS_FILE`, `COMMAND_TIMEOUT_SECS`, `LOG_LEVEL`,
    /// `LOG_FORMAT`. Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a value does not parse.
    pub fn apply_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix("DVC_API_") else {
                continue;
            };
            let value: String = value.into();
            match name {
                "BIND" => self.server.bind = value,
                "PORT" => self.server.port = parse_var(name, &value)?,
                "REPO_DIR" => self.dvc.repo_dir = PathBuf::from(value),
                "DVC_BIN" => self.dvc.binary = PathBuf::from(value),
                "PRIMARY_PARAMS_FILE" => self.dvc.primary_params_file = value,
                "FALLBACK_PARAMS_FILE" => self.dvc.fallback_params_file = value,
                "COMMAND_TIMEOUT_SECS" => {
                    self.dvc.command_timeout_secs = if value.is_empty() {
                        None
                    } else {
                        Some(parse_var(name, &value)?)
                    };
                }
                "LOG_LEVEL" => self.logging.level = value,
                "LOG_FORMAT" => {
                    self.logging.format = match value.to_ascii_lowercase().as_str() {
                        "json" => LogFormat::Json,
                        "pretty" => LogFormat::Pretty,
                        other => {
                            return Err(Error::Config(format!(
                                "DVC_API_LOG_FORMAT: unknown format '{other}'"
                            )))
                        }
                    };
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Socket address string for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    /// Build the DVC-backed repository described by this configuration.
    #[must_use]
    pub fn dvc_repository(&self) -> DvcRepository {
        DvcRepository::builder(&self.dvc.repo_dir)
            .dvc_bin(&self.dvc.binary)
            .primary_params_file(&self.dvc.primary_params_file)
            .fallback_params_file(&self.dvc.fallback_params_file)
            .timeout(self.dvc.command_timeout_secs.map(Duration::from_secs))
            .build()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::Config(format!("DVC_API_{name}: {e}")))
}
