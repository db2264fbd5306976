//! Estimate sources
//!
//! The fetch layer sits behind [`EstimateSource`]; everything past it is
//! pure. The bundled source reads backend payloads saved as JSON files.

use std::path::{Path, PathBuf};

use crate::error::{EstimateError, EstimateResult};
use crate::models::{EstimateId, RawEstimate};

use super::file_io::{read_json_required, write_json_atomic};

/// Something that can fetch raw estimate payloads by id
pub trait EstimateSource {
    fn fetch(&self, estimate_id: &EstimateId) -> EstimateResult<RawEstimate>;
}

/// Reads `<dir>/<estimate id>.json`
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the payload file for an estimate
    pub fn path_for(&self, estimate_id: &EstimateId) -> PathBuf {
        self.dir.join(format!("{}.json", estimate_id))
    }

    /// Save a payload under its estimate id
    pub fn store(&self, estimate_id: &EstimateId, raw: &RawEstimate) -> EstimateResult<()> {
        write_json_atomic(self.path_for(estimate_id), raw)
    }
}

impl EstimateSource for JsonFileSource {
    fn fetch(&self, estimate_id: &EstimateId) -> EstimateResult<RawEstimate> {
        if estimate_id.is_blank() || estimate_id.as_str().contains(['/', '\\']) {
            return Err(EstimateError::Validation(format!(
                "Invalid estimate id: '{}'",
                estimate_id
            )));
        }

        let path = self.path_for(estimate_id);
        if !path.exists() {
            return Err(EstimateError::estimate_not_found(estimate_id.to_string()));
        }
        read_json_required(path)
    }
}

/// Read a raw estimate payload from an explicit file
pub fn read_raw_estimate(path: &Path) -> EstimateResult<RawEstimate> {
    read_json_required(path)
}
