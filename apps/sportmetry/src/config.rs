//! # Application Configuration
//!
//! TOML configuration of the command-line application. The file is located
//! via `--config`, then the `SPORTMETRY_CONFIG` environment variable; a
//! missing file means defaults.
//!
//! ```toml
//! lang = "en"
//! tables = "reference.json"
//!
//! [engine.anthropometry]
//! correction_constant = 0.125
//!
//! [engine.reference]
//! percentile = { key = "age", value = "%" }
//!
//! [engine.layout]
//! iterations = 500
//! ```

use crate::labels::Lang;
use serde::{Deserialize, Serialize};
use sportmetry_core::{EngineConfig, SportmetryError};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "SPORTMETRY_CONFIG";

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Everything the application reads from its TOML file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default label language when `--lang` is not given.
    pub lang: Lang,
    /// Default reference tables when `--tables` is not given.
    pub tables: Option<PathBuf>,
    /// Engine parameters handed to `sportmetry-core`.
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load the configuration from an explicit path or the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SportmetryError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load_file(&path),
            None => {
                tracing::debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load one TOML file; a missing file yields defaults.
    pub fn load_file(path: &Path) -> Result<Self, SportmetryError> {
        if !path.exists() {
            tracing::warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| SportmetryError::IoError(format!("Cannot read file metadata: {}", e)))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(SportmetryError::IoError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SportmetryError::IoError(format!("Read config: {}", e)))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| SportmetryError::DeserializationError(format!("Config: {}", e)))?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}
