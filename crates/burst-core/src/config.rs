//! Solver configuration loading.
//!
//! Resolution order for the config file:
//! 1. Explicit CLI path (`--config`)
//! 2. `BURST_CONFIG` environment variable (direct path)
//! 3. `BURST_CONFIG_DIR` environment variable + `config.json`
//! 4. XDG config directory (`~/.config/burst-levels/config.json`)
//! 5. Built-in defaults
//!
//! Paths named explicitly (1, 2) must exist; discovered paths (3, 4) are
//! used only when present. CLI `-s` / `-g` flags override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::inference::TrellisParams;

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "BURST_CONFIG";
pub const ENV_CONFIG_DIR: &str = "BURST_CONFIG_DIR";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.json";

/// Application name for XDG directories.
const APP_NAME: &str = "burst-levels";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,
    /// Set via environment variable.
    Environment,
    /// Found in XDG config directory.
    XdgConfig,
    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Solver parameters as stored in `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Growth factor between adjacent rate levels.
    pub s: f64,
    /// Penalty per level of escalation.
    pub gamma: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            s: TrellisParams::DEFAULT_S,
            gamma: TrellisParams::DEFAULT_GAMMA,
        }
    }
}

impl SolverConfig {
    /// Apply CLI overrides.
    pub fn with_overrides(mut self, s: Option<f64>, gamma: Option<f64>) -> Self {
        if let Some(s) = s {
            self.s = s;
        }
        if let Some(gamma) = gamma {
            self.gamma = gamma;
        }
        self
    }

    /// Validate into solver parameters.
    pub fn params(&self) -> Result<TrellisParams> {
        TrellisParams::new(self.s, self.gamma)
    }
}

/// Configuration with provenance information.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub solver: SolverConfig,
    /// Path to the config file (None if using defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Parse a config file's contents.
pub fn parse_config(path: &Path, content: &str) -> std::result::Result<SolverConfig, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse one config file.
pub fn load_config_file(path: &Path) -> std::result::Result<SolverConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::IoError {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_config(path, &content)
}

/// Locate the config file using the standard resolution order.
pub fn resolve_config_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    resolve_config_path_with(
        cli_path,
        std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from),
        std::env::var_os(ENV_CONFIG_DIR).map(PathBuf::from),
        dirs::config_dir(),
    )
}

fn resolve_config_path_with(
    cli_path: Option<&Path>,
    env_path: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg_dir: Option<PathBuf>,
) -> (Option<PathBuf>, ConfigSource) {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    // 2. Environment variable (direct path)
    if let Some(path) = env_path {
        return (Some(path), ConfigSource::Environment);
    }

    // 3. Environment variable (config dir)
    if let Some(dir) = env_dir {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(xdg) = xdg_dir {
        let path = xdg.join(APP_NAME).join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    // 5. Built-in defaults
    (None, ConfigSource::BuiltinDefault)
}

/// Resolve and load the solver configuration.
pub fn load_config(cli_path: Option<&Path>) -> std::result::Result<ResolvedConfig, ConfigError> {
    let (path, source) = resolve_config_path(cli_path);
    let solver = match &path {
        Some(p) => load_config_file(p)?,
        None => SolverConfig::default(),
    };
    Ok(ResolvedConfig {
        solver,
        path,
        source,
    })
}
