//! Configuration file loading
//!
//! Every key is optional; CLI flags override file values.

use anyhow::{Context, Result};
use pharmloc_geo::AccuracyThresholds;
use pharmloc_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Standard config locations, relative to the working directory
const CANDIDATES: [&str; 3] = [".pharmloc.toml", "pharmloc.toml", ".config/pharmloc.toml"];

/// Root configuration schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSchema {
    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub accuracy: AccuracyThresholds,

    #[serde(default)]
    pub logging: TelemetryConfig,
}

/// Defaults for the `rank` command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Keep at most this many results
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Only keep pharmacies within this many kilometers
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist; discovered files are optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    CANDIDATES
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
