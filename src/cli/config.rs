//! Configuration file
//!
//! ```json
//! {
//!   "definitions_dir": "./models",
//!   "log_level": "info",
//!   "strict_formats": false
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of model declaration files (required)
    pub definitions_dir: String,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reject unknown format tags during validation (optional, default false)
    #[serde(default)]
    pub strict_formats: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.definitions_dir.trim().is_empty() {
            return Err(CliError::config_error("definitions_dir must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Definitions directory relative to the config file's directory
    pub fn definitions_path(&self, config_path: &Path) -> std::path::PathBuf {
        let dir = Path::new(&self.definitions_dir);
        if dir.is_absolute() {
            return dir.to_path_buf();
        }
        match config_path.parent() {
            Some(base) => base.join(dir),
            None => dir.to_path_buf(),
        }
    }
}
