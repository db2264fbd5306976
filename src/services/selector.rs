//! Allocation selector
//!
//! Cascading level → group → section → subsection selection, as a pure
//! transition function plus a small driver that remembers the last target it
//! emitted. Descendant choices never survive a change of ancestor, and a
//! target is emitted only when the resolved `(estimate, level, target)`
//! tuple actually changes.

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;
use crate::models::{
    AllocationLevel, AllocationTarget, Estimate, EstimateId, NodeId, Section, Subsection,
};

use super::resolver::{locate, resolve_target, Selection};

/// The selector's current choice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorState {
    pub level: AllocationLevel,
    pub group_id: Option<NodeId>,
    pub section_id: Option<NodeId>,
    pub subsection_id: Option<NodeId>,
}

impl SelectorState {
    /// A state at `level` with nothing chosen
    pub fn cleared(level: AllocationLevel) -> Self {
        Self {
            level,
            group_id: None,
            section_id: None,
            subsection_id: None,
        }
    }

    pub fn selection(&self) -> Selection {
        Selection::new(
            self.group_id.clone(),
            self.section_id.clone(),
            self.subsection_id.clone(),
        )
    }

    /// Choose a group and reset everything beneath it to its first children
    fn with_group(mut self, estimate: &Estimate, group_id: &NodeId) -> Self {
        let first_section = estimate.sections_of(group_id).first();
        self.group_id = Some(group_id.clone());
        self.section_id = first_section.map(|s| s.item.id.clone());
        self.subsection_id = first_section
            .and_then(|s| s.subsections.first())
            .map(|ss| ss.item.id.clone());
        self
    }

    fn with_section(mut self, section: &Section) -> Self {
        self.group_id = Some(section.group_id.clone());
        self.section_id = Some(section.item.id.clone());
        self.subsection_id = section.subsections.first().map(|ss| ss.item.id.clone());
        self
    }

    fn with_subsection(mut self, subsection: &Subsection) -> Self {
        self.group_id = Some(subsection.group_id.clone());
        self.section_id = Some(subsection.section_id.clone());
        self.subsection_id = Some(subsection.item.id.clone());
        self
    }

    /// Default to the first group, section and subsection in document order
    fn with_first_nodes(self, estimate: &Estimate) -> Self {
        match estimate.first_group() {
            Some(group) => self.with_group(estimate, &group.item.id),
            None => Self::cleared(self.level),
        }
    }
}

/// A user action on the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    SetLevel(AllocationLevel),
    SelectGroup(NodeId),
    SelectSection(NodeId),
    SelectSubsection(NodeId),
}

/// Apply one event to a state
///
/// Selecting an id that is not a node of the named kind fails and leaves the
/// caller's state untouched. Re-selecting the current id changes nothing.
pub fn transition(
    estimate: &Estimate,
    state: &SelectorState,
    event: &SelectorEvent,
) -> Result<SelectorState, AllocationError> {
    let next = state.clone();

    if let SelectorEvent::SetLevel(level) = event {
        return Ok(match level {
            AllocationLevel::Estimate => SelectorState::cleared(AllocationLevel::Estimate),
            _ if state.group_id.is_none() => SelectorState {
                level: *level,
                ..next
            }
            .with_first_nodes(estimate),
            _ => SelectorState {
                level: *level,
                ..next
            },
        });
    }

    if estimate.is_empty() {
        return Err(AllocationError::EmptyStructure {
            estimate_id: estimate.estimate_id.to_string(),
        });
    }

    let not_found = |id: &NodeId| AllocationError::NotFound {
        target_id: id.to_string(),
    };

    match event {
        SelectorEvent::SetLevel(_) => Ok(next),
        SelectorEvent::SelectGroup(id) => {
            if state.group_id.as_ref() == Some(id) {
                return Ok(next);
            }
            let group = estimate.find_group(id).ok_or_else(|| not_found(id))?;
            Ok(next.with_group(estimate, &group.item.id))
        }
        SelectorEvent::SelectSection(id) => {
            let section = estimate.find_section(id).ok_or_else(|| not_found(id))?;
            if state.section_id.as_ref() == Some(id)
                && state.group_id.as_ref() == Some(&section.group_id)
            {
                return Ok(next);
            }
            Ok(next.with_section(section))
        }
        SelectorEvent::SelectSubsection(id) => {
            let subsection = estimate.find_subsection(id).ok_or_else(|| not_found(id))?;
            Ok(next.with_subsection(subsection))
        }
    }
}

/// Choose the starting state for an estimate
///
/// A saved target from this estimate is restored when its node still
/// exists; a whole-estimate target clears the ids. Otherwise, and only
/// otherwise, the first nodes in document order are chosen. A target from a
/// different estimate is ignored.
pub fn initial_state(
    estimate: &Estimate,
    existing: Option<&AllocationTarget>,
    default_level: AllocationLevel,
) -> SelectorState {
    let existing = existing.filter(|t| t.estimate_id == estimate.estimate_id);

    let Some(target) = existing else {
        return default_state(estimate, default_level);
    };

    if target.is_whole_estimate() {
        return SelectorState::cleared(AllocationLevel::Estimate);
    }

    let located = target
        .target_id
        .as_ref()
        .and_then(|id| locate(estimate, id).ok());

    match located {
        Some(path) => SelectorState {
            level: path.level.allocation_level(),
            group_id: Some(path.group_id),
            section_id: path.section_id,
            subsection_id: path.subsection_id,
        },
        None => default_state(estimate, target.level),
    }
}

fn default_state(estimate: &Estimate, level: AllocationLevel) -> SelectorState {
    if level == AllocationLevel::Estimate {
        SelectorState::cleared(level)
    } else {
        SelectorState::cleared(level).with_first_nodes(estimate)
    }
}

/// Drives the transitions against the latest estimate snapshot
///
/// Initializes once per estimate id; later snapshots of the same estimate
/// replace the data but keep the user's choice.
#[derive(Debug, Clone)]
pub struct AllocationSelector {
    default_level: AllocationLevel,
    estimate: Option<Estimate>,
    state: SelectorState,
    initialized_for: Option<EstimateId>,
    last_emitted: Option<AllocationTarget>,
}

impl AllocationSelector {
    /// Create a selector that starts new allocations at `default_level`
    pub fn new(default_level: AllocationLevel) -> Self {
        Self {
            default_level,
            estimate: None,
            state: SelectorState::cleared(default_level),
            initialized_for: None,
            last_emitted: None,
        }
    }

    /// Receive hierarchy data, restoring `existing` the first time this
    /// estimate is seen
    ///
    /// Returns the target to emit, if it differs from the last one. A
    /// restored target that resolves to itself is not re-emitted.
    pub fn receive(
        &mut self,
        estimate: Estimate,
        existing: Option<&AllocationTarget>,
    ) -> Option<AllocationTarget> {
        if self.initialized_for.as_ref() != Some(&estimate.estimate_id) {
            self.state = initial_state(&estimate, existing, self.default_level);
            self.initialized_for = Some(estimate.estimate_id.clone());
            if let Some(target) = existing.filter(|t| t.estimate_id == estimate.estimate_id) {
                self.last_emitted = Some(target.clone());
            }
        }
        self.estimate = Some(estimate);
        self.emit()
    }

    /// Apply a user event, returning the target to emit if it changed
    pub fn apply(
        &mut self,
        event: &SelectorEvent,
    ) -> Result<Option<AllocationTarget>, AllocationError> {
        let estimate = self.loaded()?;
        self.state = transition(estimate, &self.state, event)?;
        Ok(self.emit())
    }

    /// Resolve the current state without emitting
    pub fn current_target(&self) -> Result<AllocationTarget, AllocationError> {
        resolve_target(self.loaded()?, self.state.level, &self.state.selection())
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn last_emitted(&self) -> Option<&AllocationTarget> {
        self.last_emitted.as_ref()
    }

    /// Sections of the chosen group
    pub fn section_options(&self) -> &[Section] {
        match (&self.estimate, &self.state.group_id) {
            (Some(estimate), Some(group_id)) => estimate.sections_of(group_id),
            _ => &[],
        }
    }

    /// Subsections of the chosen section
    pub fn subsection_options(&self) -> &[Subsection] {
        match (&self.estimate, &self.state.section_id) {
            (Some(estimate), Some(section_id)) => estimate.subsections_of(section_id),
            _ => &[],
        }
    }

    fn loaded(&self) -> Result<&Estimate, AllocationError> {
        self.estimate
            .as_ref()
            .ok_or_else(|| AllocationError::EmptyStructure {
                estimate_id: String::new(),
            })
    }

    fn emit(&mut self) -> Option<AllocationTarget> {
        let target = self.current_target().ok()?;
        if self.last_emitted.as_ref() == Some(&target) {
            return None;
        }
        self.last_emitted = Some(target.clone());
        Some(target)
    }
}
