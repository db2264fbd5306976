//! Estimate service
//!
//! Fetches a raw payload, builds the tree and rolls it up, so every consumer
//! sees the same aggregated estimate.

use std::path::Path;

use crate::audit::EntityType;
use crate::error::{EstimateError, EstimateResult};
use crate::models::{Estimate, EstimateId, RawEstimate};
use crate::storage::{read_raw_estimate, EstimateSource, Storage};

use super::hierarchy::build;
use super::rollup::aggregate_owned;

/// Service for loading aggregated estimates
pub struct EstimateService<'a, S: EstimateSource> {
    source: &'a S,
}

impl<'a, S: EstimateSource> EstimateService<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch, build and aggregate an estimate
    ///
    /// A payload that carries no id of its own takes the requested one.
    pub fn load(&self, estimate_id: &EstimateId) -> EstimateResult<Estimate> {
        let raw = self.source.fetch(estimate_id)?;
        let mut estimate = build(&raw);
        if estimate.estimate_id.is_blank() {
            estimate.estimate_id = estimate_id.clone();
        }
        Ok(aggregate_owned(estimate))
    }
}

/// Build and aggregate an estimate from a payload file
pub fn load_from_path(path: &Path) -> EstimateResult<Estimate> {
    let raw = read_raw_estimate(path)?;
    let mut estimate = build(&raw);
    if estimate.estimate_id.is_blank() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            estimate.estimate_id = EstimateId::from(stem);
        }
    }
    Ok(aggregate_owned(estimate))
}

/// Save a payload into the data directory so it can be loaded by id
///
/// Re-importing an id replaces the stored payload and is logged as an
/// update.
pub fn import_estimate(
    storage: &Storage,
    raw: &RawEstimate,
    id_override: Option<EstimateId>,
) -> EstimateResult<Estimate> {
    let estimate_id = id_override
        .filter(|id| !id.is_blank())
        .or_else(|| raw.identifier().map(EstimateId::from))
        .ok_or_else(|| {
            EstimateError::Validation("Estimate payload has no id; pass one with --id".into())
        })?;

    let previous = storage.estimates.fetch(&estimate_id).ok();
    storage.estimates.store(&estimate_id, raw)?;

    let mut estimate = build(raw);
    estimate.estimate_id = estimate_id.clone();
    let estimate = aggregate_owned(estimate);

    let name = (!estimate.name.is_empty()).then(|| estimate.name.clone());
    match previous {
        Some(before) => storage.log_update(
            EntityType::Estimate,
            estimate_id.to_string(),
            name,
            &before,
            raw,
            Some(format!("payload replaced ({} nodes)", estimate.node_count())),
        )?,
        None => storage.log_create(EntityType::Estimate, estimate_id.to_string(), name, raw)?,
    }

    Ok(estimate)
}
