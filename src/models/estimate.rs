//! Estimate model: the root of the budget hierarchy
//!
//! An estimate is a read-only snapshot per fetch. Consumers derive new trees
//! rather than editing nodes in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{EstimateId, NodeId, ProjectId};
use super::line_item::{Group, LineItem, NodeLevel, Section, Subsection};
use super::money::Money;

/// A project's budget document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub estimate_id: EstimateId,

    pub project_id: ProjectId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Sum of group amounts
    pub total: Money,

    /// Sum of group spent
    pub spent: Money,

    /// `total - spent`
    pub balance: Money,

    #[serde(default)]
    pub groups: Vec<Group>,
}

/// One node of the tree with its ancestry, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct FlatNode<'a> {
    pub level: NodeLevel,
    pub item: &'a LineItem,
    pub group_id: &'a NodeId,
    pub section_id: Option<&'a NodeId>,
}

impl<'a> FlatNode<'a> {
    /// Nesting depth, 0 for groups
    pub fn depth(&self) -> usize {
        match self.level {
            NodeLevel::Group => 0,
            NodeLevel::Section => 1,
            NodeLevel::Subsection => 2,
        }
    }
}

impl Estimate {
    /// Create an empty estimate
    pub fn new(estimate_id: impl Into<EstimateId>, project_id: impl Into<ProjectId>) -> Self {
        Self {
            estimate_id: estimate_id.into(),
            project_id: project_id.into(),
            name: String::new(),
            status: String::new(),
            date: None,
            total: Money::zero(),
            spent: Money::zero(),
            balance: Money::zero(),
            groups: Vec::new(),
        }
    }

    /// Whether the estimate has any budget structure at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn find_group(&self, id: &NodeId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.item.id == id)
    }

    /// Find a section anywhere in the estimate
    pub fn find_section(&self, id: &NodeId) -> Option<&Section> {
        self.sections().find(|s| &s.item.id == id)
    }

    /// Find a subsection anywhere in the estimate
    pub fn find_subsection(&self, id: &NodeId) -> Option<&Subsection> {
        self.subsections().find(|s| &s.item.id == id)
    }

    /// All sections in document order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.groups.iter().flat_map(|g| g.sections.iter())
    }

    /// All subsections in document order
    pub fn subsections(&self) -> impl Iterator<Item = &Subsection> {
        self.sections().flat_map(|s| s.subsections.iter())
    }

    pub fn first_group(&self) -> Option<&Group> {
        self.groups.first()
    }

    /// Sections of one group, empty when the group is unknown
    pub fn sections_of(&self, group_id: &NodeId) -> &[Section] {
        self.find_group(group_id)
            .map(|g| g.sections.as_slice())
            .unwrap_or(&[])
    }

    /// Subsections of one section, empty when the section is unknown
    pub fn subsections_of(&self, section_id: &NodeId) -> &[Subsection] {
        self.find_section(section_id)
            .map(|s| s.subsections.as_slice())
            .unwrap_or(&[])
    }

    /// Every node in document order: each group, then its sections, each
    /// followed by its subsections
    pub fn flatten(&self) -> Vec<FlatNode<'_>> {
        let mut nodes = Vec::new();
        for group in &self.groups {
            nodes.push(FlatNode {
                level: NodeLevel::Group,
                item: &group.item,
                group_id: &group.item.id,
                section_id: None,
            });
            for section in &group.sections {
                nodes.push(FlatNode {
                    level: NodeLevel::Section,
                    item: &section.item,
                    group_id: &section.group_id,
                    section_id: None,
                });
                for subsection in &section.subsections {
                    nodes.push(FlatNode {
                        level: NodeLevel::Subsection,
                        item: &subsection.item,
                        group_id: &subsection.group_id,
                        section_id: Some(&subsection.section_id),
                    });
                }
            }
        }
        nodes
    }

    /// Number of nodes at all levels
    pub fn node_count(&self) -> usize {
        self.groups.len() + self.sections().count() + self.subsections().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Estimate {
        let mut estimate = Estimate::new("est-1", "prj-1");
        let g1 = NodeId::from("g1");
        let s1 = NodeId::from("s1");
        estimate.groups.push(Group {
            item: LineItem::new("g1", "Substructure"),
            sections: vec![Section {
                item: LineItem::new("s1", "Excavation"),
                group_id: g1.clone(),
                subsections: vec![
                    Subsection {
                        item: LineItem::new("ss1", "Bulk dig"),
                        group_id: g1.clone(),
                        section_id: s1.clone(),
                    },
                    Subsection {
                        item: LineItem::new("ss2", "Trenches"),
                        group_id: g1.clone(),
                        section_id: s1.clone(),
                    },
                ],
            }],
        });
        estimate.groups.push(Group {
            item: LineItem::new("g2", "Superstructure"),
            sections: Vec::new(),
        });
        estimate
    }

    #[test]
    fn test_find_nodes() {
        let estimate = sample();
        assert!(estimate.find_group(&"g2".into()).is_some());
        assert_eq!(
            estimate.find_section(&"s1".into()).map(|s| s.group_id.as_str()),
            Some("g1")
        );
        assert_eq!(
            estimate
                .find_subsection(&"ss2".into())
                .map(|s| s.section_id.as_str()),
            Some("s1")
        );
        assert!(estimate.find_subsection(&"s1".into()).is_none());
    }

    #[test]
    fn test_flatten_document_order() {
        let estimate = sample();
        let ids: Vec<&str> = estimate
            .flatten()
            .iter()
            .map(|n| n.item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["g1", "s1", "ss1", "ss2", "g2"]);

        let flat = estimate.flatten();
        assert_eq!(flat[2].depth(), 2);
        assert_eq!(flat[2].section_id.map(|s| s.as_str()), Some("s1"));
        assert_eq!(flat[1].group_id.as_str(), "g1");
    }

    #[test]
    fn test_children_lookups() {
        let estimate = sample();
        assert_eq!(estimate.sections_of(&"g1".into()).len(), 1);
        assert!(estimate.sections_of(&"g2".into()).is_empty());
        assert!(estimate.sections_of(&"nope".into()).is_empty());
        assert_eq!(estimate.subsections_of(&"s1".into()).len(), 2);
        assert_eq!(estimate.node_count(), 5);
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["estimateId"], "est-1");
        assert_eq!(value["projectId"], "prj-1");

        let group = &value["groups"][0];
        assert!(group.get("declaredAmount").is_some());
        assert!(group.get("declared_amount").is_none());

        let subsection = &group["sections"][0]["subsections"][1];
        assert_eq!(subsection["groupId"], "g1");
        assert_eq!(subsection["sectionId"], "s1");
    }

    #[test]
    fn test_empty() {
        let estimate = Estimate::new("est-2", "prj-1");
        assert!(estimate.is_empty());
        assert!(estimate.flatten().is_empty());
        assert!(estimate.first_group().is_none());
    }
}
