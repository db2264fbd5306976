//! Allocation service
//!
//! Runs a document's allocation choice through the selector and records the
//! resulting target in the audit log.

use crate::audit::{generate_diff, EntityType};
use crate::error::{EstimateError, EstimateResult};
use crate::models::{AllocatedDocument, AllocationLevel, AllocationTarget, Estimate, NodeId};
use crate::storage::Storage;

use super::selector::{AllocationSelector, SelectorEvent};

/// What the user picked, applied in order: level, group, section, subsection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationRequest {
    pub level: Option<AllocationLevel>,
    pub group_id: Option<NodeId>,
    pub section_id: Option<NodeId>,
    pub subsection_id: Option<NodeId>,
}

impl AllocationRequest {
    fn events(&self) -> Vec<SelectorEvent> {
        let mut events = Vec::new();
        if let Some(level) = self.level {
            events.push(SelectorEvent::SetLevel(level));
        }
        if let Some(id) = &self.group_id {
            events.push(SelectorEvent::SelectGroup(id.clone()));
        }
        if let Some(id) = &self.section_id {
            events.push(SelectorEvent::SelectSection(id.clone()));
        }
        if let Some(id) = &self.subsection_id {
            events.push(SelectorEvent::SelectSubsection(id.clone()));
        }
        events
    }
}

/// Outcome of recording an allocation
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationChange {
    Created,
    Updated { diff: Option<String> },
    Unchanged,
}

/// Resolve the target a request lands on
///
/// The existing target is restored first; the request's events are then
/// applied on top of it.
pub fn plan_allocation(
    estimate: Estimate,
    existing: Option<&AllocationTarget>,
    default_level: AllocationLevel,
    request: &AllocationRequest,
) -> EstimateResult<AllocationTarget> {
    let mut selector = AllocationSelector::new(default_level);
    selector.receive(estimate, existing);

    for event in request.events() {
        selector.apply(&event)?;
    }

    Ok(selector.current_target()?)
}

/// Service for recording allocations
pub struct AllocationService<'a> {
    storage: &'a Storage,
}

impl<'a> AllocationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Log a document's new target, compared with what it had before
    pub fn record(
        &self,
        document: &AllocatedDocument,
        previous: Option<&AllocationTarget>,
    ) -> EstimateResult<AllocationChange> {
        let label = Some(document.target.to_string());

        match previous {
            None => {
                self.storage.log_create(
                    EntityType::Allocation,
                    document.audit_key(),
                    label,
                    &document.target,
                )?;
                Ok(AllocationChange::Created)
            }
            Some(before) if before == &document.target => Ok(AllocationChange::Unchanged),
            Some(before) => {
                let diff = generate_diff(
                    &serde_json::to_value(before).map_err(EstimateError::from)?,
                    &serde_json::to_value(&document.target).map_err(EstimateError::from)?,
                );
                self.storage.log_update(
                    EntityType::Allocation,
                    document.audit_key(),
                    label,
                    before,
                    &document.target,
                    diff.clone(),
                )?;
                Ok(AllocationChange::Updated { diff })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::EstimatePaths;
    use crate::error::AllocationError;
    use crate::models::{DocumentKind, Money, RawEstimate};
    use crate::services::{aggregate, build};
    use serde_json::json;
    use tempfile::TempDir;

    fn estimate() -> Estimate {
        let raw: RawEstimate = serde_json::from_value(json!({
            "estimateId": "est-1",
            "groups": [
                {"id": "g1", "sections": [
                    {"id": "s1", "subsections": [{"id": "ss1"}, {"id": "ss2"}]}
                ]},
                {"id": "g2", "sections": [
                    {"id": "s2", "subsections": [{"id": "ss3"}]}
                ]}
            ]
        }))
        .unwrap();
        aggregate(&build(&raw))
    }

    #[test]
    fn test_plan_defaults_to_first_subsection() {
        let target = plan_allocation(
            estimate(),
            None,
            AllocationLevel::Subsection,
            &AllocationRequest::default(),
        )
        .unwrap();
        assert_eq!(target, AllocationTarget::subsection("est-1", "ss1"));
    }

    #[test]
    fn test_plan_applies_events_over_existing() {
        let existing = AllocationTarget::subsection("est-1", "ss2");
        let request = AllocationRequest {
            group_id: Some("g2".into()),
            ..AllocationRequest::default()
        };

        let target = plan_allocation(
            estimate(),
            Some(&existing),
            AllocationLevel::Subsection,
            &request,
        )
        .unwrap();
        assert_eq!(target, AllocationTarget::subsection("est-1", "ss3"));
    }

    #[test]
    fn test_plan_whole_estimate() {
        let request = AllocationRequest {
            level: Some(AllocationLevel::Estimate),
            ..AllocationRequest::default()
        };
        let target =
            plan_allocation(estimate(), None, AllocationLevel::Group, &request).unwrap();
        assert_eq!(target, AllocationTarget::estimate("est-1"));
    }

    #[test]
    fn test_plan_unknown_node() {
        let request = AllocationRequest {
            section_id: Some("s9".into()),
            ..AllocationRequest::default()
        };
        let err = plan_allocation(estimate(), None, AllocationLevel::Section, &request)
            .unwrap_err();
        assert!(matches!(
            err,
            EstimateError::Allocation(AllocationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_record_create_update_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(EstimatePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let service = AllocationService::new(&storage);

        let first = AllocatedDocument::new(
            DocumentKind::PurchaseOrder,
            "PO-1",
            Money::from_cents(5_000),
            AllocationTarget::group("est-1", "g1"),
        );
        assert_eq!(
            service.record(&first, None).unwrap(),
            AllocationChange::Created
        );

        let moved = AllocatedDocument {
            target: AllocationTarget::section("est-1", "s1"),
            ..first.clone()
        };
        let change = service.record(&moved, Some(&first.target)).unwrap();
        assert!(matches!(change, AllocationChange::Updated { diff: Some(_) }));

        assert_eq!(
            service.record(&moved, Some(&moved.target)).unwrap(),
            AllocationChange::Unchanged
        );

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(entries[1].entity_id, "purchase-order:PO-1");
    }
}
