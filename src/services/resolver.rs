//! Allocation resolver
//!
//! Forward: a level plus the chosen group/section/subsection ids becomes an
//! [`AllocationTarget`]. Inverse: a node id becomes its level and ancestor
//! chain, for reopening a saved allocation.

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;
use crate::models::{AllocationLevel, AllocationTarget, Estimate, NodeId, NodeLevel};

/// The ids chosen so far in a cascading selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub group_id: Option<NodeId>,
    pub section_id: Option<NodeId>,
    pub subsection_id: Option<NodeId>,
}

impl Selection {
    pub fn new(
        group_id: Option<NodeId>,
        section_id: Option<NodeId>,
        subsection_id: Option<NodeId>,
    ) -> Self {
        Self {
            group_id,
            section_id,
            subsection_id,
        }
    }

    /// The id chosen for a level; always `None` at estimate level
    pub fn id_for(&self, level: AllocationLevel) -> Option<&NodeId> {
        match level {
            AllocationLevel::Estimate => None,
            AllocationLevel::Group => self.group_id.as_ref(),
            AllocationLevel::Section => self.section_id.as_ref(),
            AllocationLevel::Subsection => self.subsection_id.as_ref(),
        }
    }
}

/// Where a node sits in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePath {
    #[serde(rename = "type")]
    pub level: NodeLevel,
    pub group_id: NodeId,
    pub section_id: Option<NodeId>,
    pub subsection_id: Option<NodeId>,
}

impl NodePath {
    /// The id of the node itself
    pub fn node_id(&self) -> &NodeId {
        match self.level {
            NodeLevel::Group => &self.group_id,
            NodeLevel::Section => self.section_id.as_ref().unwrap_or(&self.group_id),
            NodeLevel::Subsection => self
                .subsection_id
                .as_ref()
                .or(self.section_id.as_ref())
                .unwrap_or(&self.group_id),
        }
    }

    /// The path as a selection
    pub fn selection(&self) -> Selection {
        Selection::new(
            Some(self.group_id.clone()),
            self.section_id.clone(),
            self.subsection_id.clone(),
        )
    }

    /// Ancestor ids from the group down, excluding the node itself
    pub fn ancestors(&self) -> Vec<&NodeId> {
        match self.level {
            NodeLevel::Group => Vec::new(),
            NodeLevel::Section => vec![&self.group_id],
            NodeLevel::Subsection => {
                let mut chain = vec![&self.group_id];
                chain.extend(self.section_id.as_ref());
                chain
            }
        }
    }
}

/// Find a node by id: groups first, then sections, then subsections
///
/// An estimate with no groups reports `EmptyStructure` rather than
/// `NotFound`, so callers can tell an empty project from a stale reference.
pub fn locate(estimate: &Estimate, target_id: &NodeId) -> Result<NodePath, AllocationError> {
    if estimate.is_empty() {
        return Err(AllocationError::EmptyStructure {
            estimate_id: estimate.estimate_id.to_string(),
        });
    }

    if let Some(group) = estimate.find_group(target_id) {
        return Ok(NodePath {
            level: NodeLevel::Group,
            group_id: group.item.id.clone(),
            section_id: None,
            subsection_id: None,
        });
    }

    if let Some(section) = estimate.find_section(target_id) {
        return Ok(NodePath {
            level: NodeLevel::Section,
            group_id: section.group_id.clone(),
            section_id: Some(section.item.id.clone()),
            subsection_id: None,
        });
    }

    if let Some(subsection) = estimate.find_subsection(target_id) {
        return Ok(NodePath {
            level: NodeLevel::Subsection,
            group_id: subsection.group_id.clone(),
            section_id: Some(subsection.section_id.clone()),
            subsection_id: Some(subsection.item.id.clone()),
        });
    }

    Err(AllocationError::NotFound {
        target_id: target_id.to_string(),
    })
}

/// Resolve a level and selection into an allocation target
///
/// Fails with `IncompleteSelection` when the id the level needs has not been
/// chosen, and checks that the chosen id really is a node of that level.
pub fn resolve_target(
    estimate: &Estimate,
    level: AllocationLevel,
    selection: &Selection,
) -> Result<AllocationTarget, AllocationError> {
    let Some(node_level) = level.node_level() else {
        return Ok(AllocationTarget::estimate(estimate.estimate_id.clone()));
    };

    if estimate.is_empty() {
        return Err(AllocationError::EmptyStructure {
            estimate_id: estimate.estimate_id.to_string(),
        });
    }

    let id = selection
        .id_for(level)
        .filter(|id| !id.is_blank())
        .ok_or(AllocationError::IncompleteSelection { level })?;

    let path = locate(estimate, id)?;
    if path.level != node_level {
        return Err(AllocationError::LevelMismatch {
            expected: level,
            found: path.level.allocation_level(),
        });
    }

    Ok(AllocationTarget {
        estimate_id: estimate.estimate_id.clone(),
        level,
        target_id: Some(id.clone()),
    })
}

/// Check a persisted target against an estimate
///
/// The target must name this estimate, carry a node id exactly when its
/// level is not `estimate`, and that id must be a node of the stated level.
/// Returns the node's path, or `None` for whole-estimate targets.
pub fn validate_target(
    estimate: &Estimate,
    target: &AllocationTarget,
) -> Result<Option<NodePath>, AllocationError> {
    if target.estimate_id != estimate.estimate_id {
        return Err(AllocationError::EstimateMismatch {
            expected: estimate.estimate_id.to_string(),
            found: target.estimate_id.to_string(),
        });
    }

    let Some(node_level) = target.level.node_level() else {
        return match &target.target_id {
            Some(_) => Err(AllocationError::UnexpectedTarget),
            None => Ok(None),
        };
    };

    let id = target
        .target_id
        .as_ref()
        .filter(|id| !id.is_blank())
        .ok_or(AllocationError::MissingTarget {
            level: target.level,
        })?;

    let path = locate(estimate, id)?;
    if path.level != node_level {
        return Err(AllocationError::LevelMismatch {
            expected: target.level,
            found: path.level.allocation_level(),
        });
    }
    Ok(Some(path))
}
