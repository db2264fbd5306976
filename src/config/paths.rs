//! Path management for EstimateCLI
//!
//! ## Path Resolution Order
//!
//! 1. `ESTIMATE_CLI_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/estimate-cli` on Linux, `%APPDATA%` on Windows,
//!    `~/Library/Application Support` on macOS)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::EstimateError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "ESTIMATE_CLI_DATA_DIR";

/// Manages all paths used by EstimateCLI
#[derive(Debug, Clone)]
pub struct EstimatePaths {
    base_dir: PathBuf,
}

impl EstimatePaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, EstimateError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create EstimatePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding fetched estimate payloads (`<base>/data/estimates`)
    pub fn estimates_dir(&self) -> PathBuf {
        self.data_dir().join("estimates")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), EstimateError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| EstimateError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.estimates_dir()).map_err(|e| {
            EstimateError::Io(format!("Failed to create estimates directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if EstimateCLI has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, EstimateError> {
    ProjectDirs::from("", "", "estimate-cli")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| EstimateError::Config("Could not determine a home directory".into()))
}
