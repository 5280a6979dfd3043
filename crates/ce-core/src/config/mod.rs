//! Configuration loading for calceff.
//!
//! This module handles:
//! - Loading the TOML config file with the `[solver]` table
//! - Config resolution order (CLI > --config/env > XDG > defaults)
//! - Validation of the resolved solver settings

use std::path::{Path, PathBuf};

use ce_math::{EfficiencyError, HdrMethod, RootFinder, SolverConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "calceff";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid solver settings: {0}")]
    Invalid(#[from] EfficiencyError),
}

/// On-disk config file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub solver: SolverConfig,
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit config file (`--config` or `CALCEFF_CONFIG`); must exist.
    pub config_path: Option<PathBuf>,
    /// Override for the directory searched when no explicit file is given.
    pub config_dir: Option<PathBuf>,
    /// `--method` flag.
    pub method: Option<HdrMethod>,
    /// `--root-finder` flag.
    pub root_finder: Option<RootFinder>,
}

/// Resolved solver settings with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub solver: SolverConfig,
    /// File the settings were read from (None if using defaults).
    pub source: Option<PathBuf>,
}

/// Load solver settings with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. CLI flags (`--method`, `--root-finder`)
/// 2. Explicit config file (`--config` / `CALCEFF_CONFIG`)
/// 3. `$XDG_CONFIG_HOME/calceff/config.toml`, if present
/// 4. Built-in defaults
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let source = match &options.config_path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound { path: path.clone() });
            }
            Some(path.clone())
        }
        None => resolve_config_dir(options)
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file()),
    };

    let mut solver = match &source {
        Some(path) => load_config_file(path)?.solver,
        None => SolverConfig::default(),
    };

    if let Some(method) = options.method {
        solver.method = method;
    }
    if let Some(root_finder) = options.root_finder {
        solver.root_finder = root_finder;
    }
    solver.validate()?;

    tracing::debug!(
        source = ?source,
        method = %solver.method,
        root_finder = %solver.root_finder,
        x_tolerance = solver.x_tolerance,
        max_iterations = solver.max_iterations,
        "solver settings resolved"
    );

    Ok(ResolvedConfig { solver, source })
}

/// Directory searched for `config.toml` when no explicit file is given.
fn resolve_config_dir(options: &ConfigOptions) -> Option<PathBuf> {
    if let Some(dir) = &options.config_dir {
        return Some(dir.clone());
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
}

/// Read and parse one config file.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
