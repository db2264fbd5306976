//! Commitment summary
//!
//! Totals what purchase orders, expenses, wages, payslips and subcontractor
//! assignments have committed against each budget line. A document charged
//! to a subsection also counts toward its section, its group and the
//! estimate as a whole.

use std::collections::HashMap;

use crate::error::AllocationError;
use crate::models::{AllocatedDocument, Estimate, Money, NodeId};

use super::resolver::validate_target;

/// A document whose target did not validate against the estimate
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedDocument {
    pub document: AllocatedDocument,
    pub reason: AllocationError,
}

/// Committed amounts per node and for the whole estimate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitmentSummary {
    by_node: HashMap<NodeId, Money>,
    pub estimate_committed: Money,
    pub accepted: usize,
    pub rejected: Vec<RejectedDocument>,
}

impl CommitmentSummary {
    /// Amount committed to a node and everything beneath it
    pub fn committed_for(&self, node_id: &NodeId) -> Money {
        self.by_node.get(node_id).copied().unwrap_or_default()
    }

    fn add(&mut self, node_id: &NodeId, amount: Money) {
        *self.by_node.entry(node_id.clone()).or_default() += amount;
    }
}

/// Summarize documents against an estimate
///
/// Invalid targets (stale nodes, other estimates, wrong levels) are listed
/// in `rejected` and do not stop the rest from being counted.
pub fn summarize_commitments(
    estimate: &Estimate,
    documents: &[AllocatedDocument],
) -> CommitmentSummary {
    let mut summary = CommitmentSummary::default();

    for document in documents {
        match validate_target(estimate, &document.target) {
            Ok(path) => {
                if let Some(path) = path {
                    summary.add(&path.group_id, document.amount);
                    if let Some(section_id) = &path.section_id {
                        summary.add(section_id, document.amount);
                    }
                    if let Some(subsection_id) = &path.subsection_id {
                        summary.add(subsection_id, document.amount);
                    }
                }
                summary.estimate_committed += document.amount;
                summary.accepted += 1;
            }
            Err(reason) => summary.rejected.push(RejectedDocument {
                document: document.clone(),
                reason,
            }),
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationTarget, DocumentKind, RawEstimate};
    use crate::services::hierarchy::build;
    use serde_json::json;

    fn estimate() -> Estimate {
        let raw: RawEstimate = serde_json::from_value(json!({
            "estimateId": "est-1",
            "groups": [
                {"id": "g1", "sections": [
                    {"id": "s1", "subsections": [{"id": "ss1"}, {"id": "ss2"}]}
                ]},
                {"id": "g2"}
            ]
        }))
        .unwrap();
        build(&raw)
    }

    fn doc(kind: DocumentKind, id: &str, cents: i64, target: AllocationTarget) -> AllocatedDocument {
        AllocatedDocument::new(kind, id, Money::from_cents(cents), target)
    }

    #[test]
    fn test_commitments_roll_up_through_ancestors() {
        let documents = vec![
            doc(
                DocumentKind::PurchaseOrder,
                "PO-1",
                10000,
                AllocationTarget::subsection("est-1", "ss1"),
            ),
            doc(
                DocumentKind::Wage,
                "W-1",
                2500,
                AllocationTarget::subsection("est-1", "ss2"),
            ),
            doc(
                DocumentKind::Expense,
                "EX-1",
                700,
                AllocationTarget::section("est-1", "s1"),
            ),
            doc(
                DocumentKind::Payslip,
                "PS-1",
                5000,
                AllocationTarget::group("est-1", "g2"),
            ),
            doc(
                DocumentKind::SubcontractorAssignment,
                "SC-1",
                300,
                AllocationTarget::estimate("est-1"),
            ),
        ];

        let summary = summarize_commitments(&estimate(), &documents);

        assert_eq!(summary.committed_for(&"ss1".into()), Money::from_cents(10000));
        assert_eq!(summary.committed_for(&"ss2".into()), Money::from_cents(2500));
        assert_eq!(summary.committed_for(&"s1".into()), Money::from_cents(13200));
        assert_eq!(summary.committed_for(&"g1".into()), Money::from_cents(13200));
        assert_eq!(summary.committed_for(&"g2".into()), Money::from_cents(5000));
        assert_eq!(summary.estimate_committed, Money::from_cents(18500));
        assert_eq!(summary.accepted, 5);
        assert!(summary.rejected.is_empty());
    }

    #[test]
    fn test_invalid_targets_are_rejected_not_fatal() {
        let documents = vec![
            doc(
                DocumentKind::PurchaseOrder,
                "PO-stale",
                100,
                AllocationTarget::subsection("est-1", "deleted"),
            ),
            doc(
                DocumentKind::Expense,
                "EX-foreign",
                100,
                AllocationTarget::group("est-9", "g1"),
            ),
            doc(
                DocumentKind::Wage,
                "W-ok",
                400,
                AllocationTarget::group("est-1", "g1"),
            ),
        ];

        let summary = summarize_commitments(&estimate(), &documents);

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected.len(), 2);
        assert!(matches!(
            summary.rejected[0].reason,
            AllocationError::NotFound { .. }
        ));
        assert!(matches!(
            summary.rejected[1].reason,
            AllocationError::EstimateMismatch { .. }
        ));
        assert_eq!(summary.estimate_committed, Money::from_cents(400));
        assert!(summary.committed_for(&"ss1".into()).is_zero());
    }
}
