//! Storage layer for EstimateCLI
//!
//! Estimate payloads are read through an [`EstimateSource`]; the bundled one
//! reads JSON files from the data directory. Allocation changes are written
//! to the audit log.

pub mod file_io;
pub mod source;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use source::{read_raw_estimate, EstimateSource, JsonFileSource};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::EstimatePaths;
use crate::error::EstimateError;

/// Main storage coordinator
pub struct Storage {
    paths: EstimatePaths,
    pub estimates: JsonFileSource,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: EstimatePaths) -> Result<Self, EstimateError> {
        paths.ensure_directories()?;

        Ok(Self {
            estimates: JsonFileSource::new(paths.estimates_dir()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &EstimatePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a newly created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), EstimateError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a changed entity in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), EstimateError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    /// Check if storage has been initialized (settings saved)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
