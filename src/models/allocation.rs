//! Allocation targets
//!
//! Purchase orders, expenses, wages, payslips and subcontractor assignments
//! each carry an [`AllocationTarget`] naming the estimate and the budget line
//! they charge against. The documents own the storage; this crate only
//! builds and checks the reference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{DocumentId, EstimateId, NodeId};
use super::line_item::AllocationLevel;
use super::money::Money;

/// Reference from a financial document to an estimate or one of its nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTarget {
    pub estimate_id: EstimateId,

    pub level: AllocationLevel,

    /// `None` for whole-estimate references
    #[serde(default)]
    pub target_id: Option<NodeId>,
}

impl AllocationTarget {
    /// Reference the whole estimate
    pub fn estimate(estimate_id: impl Into<EstimateId>) -> Self {
        Self {
            estimate_id: estimate_id.into(),
            level: AllocationLevel::Estimate,
            target_id: None,
        }
    }

    pub fn group(estimate_id: impl Into<EstimateId>, group_id: impl Into<NodeId>) -> Self {
        Self::node(estimate_id, AllocationLevel::Group, group_id)
    }

    pub fn section(estimate_id: impl Into<EstimateId>, section_id: impl Into<NodeId>) -> Self {
        Self::node(estimate_id, AllocationLevel::Section, section_id)
    }

    pub fn subsection(
        estimate_id: impl Into<EstimateId>,
        subsection_id: impl Into<NodeId>,
    ) -> Self {
        Self::node(estimate_id, AllocationLevel::Subsection, subsection_id)
    }

    fn node(
        estimate_id: impl Into<EstimateId>,
        level: AllocationLevel,
        target_id: impl Into<NodeId>,
    ) -> Self {
        Self {
            estimate_id: estimate_id.into(),
            level,
            target_id: Some(target_id.into()),
        }
    }

    /// The id this target resolves to: the estimate id at estimate level,
    /// otherwise the node id
    pub fn reference_id(&self) -> &str {
        match &self.target_id {
            Some(id) if self.level != AllocationLevel::Estimate => id.as_str(),
            _ => self.estimate_id.as_str(),
        }
    }

    pub fn is_whole_estimate(&self) -> bool {
        self.level == AllocationLevel::Estimate
    }
}

impl fmt::Display for AllocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target_id {
            Some(id) => write!(f, "{}/{}:{}", self.estimate_id, self.level, id),
            None => write!(f, "{}/{}", self.estimate_id, self.level),
        }
    }
}

/// Kinds of documents that charge against an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    PurchaseOrder,
    Expense,
    Wage,
    Payslip,
    SubcontractorAssignment,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PurchaseOrder => "purchase-order",
            Self::Expense => "expense",
            Self::Wage => "wage",
            Self::Payslip => "payslip",
            Self::SubcontractorAssignment => "subcontractor-assignment",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "purchase-order" | "po" => Ok(Self::PurchaseOrder),
            "expense" => Ok(Self::Expense),
            "wage" => Ok(Self::Wage),
            "payslip" => Ok(Self::Payslip),
            "subcontractor-assignment" | "subcontractor" => Ok(Self::SubcontractorAssignment),
            other => Err(format!("Unknown document kind: {}", other)),
        }
    }
}

/// A document's charge against a budget line, as its owner persists it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedDocument {
    pub kind: DocumentKind,

    pub document_id: DocumentId,

    #[serde(default)]
    pub amount: Money,

    pub target: AllocationTarget,
}

impl AllocatedDocument {
    pub fn new(
        kind: DocumentKind,
        document_id: impl Into<DocumentId>,
        amount: Money,
        target: AllocationTarget,
    ) -> Self {
        Self {
            kind,
            document_id: document_id.into(),
            amount,
            target,
        }
    }

    /// Key used for audit entries, e.g. `purchase-order:PO-0012`
    pub fn audit_key(&self) -> String {
        format!("{}:{}", self.kind, self.document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_id() {
        let whole = AllocationTarget::estimate("est-1");
        assert_eq!(whole.reference_id(), "est-1");
        assert!(whole.is_whole_estimate());

        let line = AllocationTarget::section("est-1", "s4");
        assert_eq!(line.reference_id(), "s4");
        assert!(!line.is_whole_estimate());
    }

    #[test]
    fn test_display() {
        assert_eq!(AllocationTarget::estimate("e1").to_string(), "e1/estimate");
        assert_eq!(
            AllocationTarget::subsection("e1", "ss2").to_string(),
            "e1/subsection:ss2"
        );
    }

    #[test]
    fn test_wire_shape() {
        let target = AllocationTarget::group("est-9", "g3");
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"estimateId": "est-9", "level": "group", "targetId": "g3"})
        );

        let whole: AllocationTarget =
            serde_json::from_str(r#"{"estimateId": "est-9", "level": "estimate", "targetId": null}"#)
                .unwrap();
        assert_eq!(whole, AllocationTarget::estimate("est-9"));
    }

    #[test]
    fn test_document_kind_parse() {
        assert_eq!(
            "purchase_order".parse::<DocumentKind>().unwrap(),
            DocumentKind::PurchaseOrder
        );
        assert_eq!("PO".parse::<DocumentKind>().unwrap(), DocumentKind::PurchaseOrder);
        assert_eq!(
            "subcontractor".parse::<DocumentKind>().unwrap(),
            DocumentKind::SubcontractorAssignment
        );
        assert!("invoice".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_audit_key() {
        let doc = AllocatedDocument::new(
            DocumentKind::Payslip,
            "PS-7",
            Money::from_cents(120000),
            AllocationTarget::estimate("est-1"),
        );
        assert_eq!(doc.audit_key(), "payslip:PS-7");
    }
}
