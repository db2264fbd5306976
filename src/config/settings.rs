//! User settings for EstimateCLI
//!
//! Display preferences and the level new allocations start at.

use serde::{Deserialize, Serialize};

use super::paths::EstimatePaths;
use crate::error::EstimateError;
use crate::models::AllocationLevel;

/// User settings for EstimateCLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when rendering amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Level a new allocation starts at when there is nothing to restore
    #[serde(default)]
    pub default_allocation_level: AllocationLevel,

    /// Show declared-vs-rolled-up variance in estimate tables
    #[serde(default = "default_show_variance")]
    pub show_variance: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_show_variance() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_allocation_level: AllocationLevel::default(),
            show_variance: default_show_variance(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &EstimatePaths) -> Result<Self, EstimateError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not saved here; the caller decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| EstimateError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| EstimateError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &EstimatePaths) -> Result<(), EstimateError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| EstimateError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| EstimateError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
