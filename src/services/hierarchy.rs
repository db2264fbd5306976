//! Hierarchy builder
//!
//! Turns a raw estimate payload into the typed Group → Section → Subsection
//! tree. Pure: no I/O, and the same payload always yields the same tree.

use std::collections::HashSet;

use crate::models::raw::{self, RawLineItem};
use crate::models::{
    Estimate, EstimateId, Group, LineItem, Money, NodeId, ProjectId, RawEstimate, RawGroup,
    RawSection, RawSubsection, Section, Subsection,
};

/// Build the estimate tree from a raw payload
///
/// Missing child arrays are empty. A missing `amount` is `rate * quantity`;
/// a supplied one is kept even when it disagrees. Figures here are each
/// node's own; run [`aggregate`](super::rollup::aggregate) to roll them up.
pub fn build(raw: &RawEstimate) -> Estimate {
    let mut estimate = Estimate::new(
        EstimateId::from(raw.identifier().unwrap_or_default()),
        ProjectId::from(raw::identifier(raw.project_id.as_ref()).unwrap_or_default()),
    );
    estimate.name = raw::text(raw.name.as_ref());
    estimate.status = raw::text(raw.status.as_ref());
    estimate.date = raw::date(raw.date.as_ref());

    let raw_groups = raw.groups.as_deref().unwrap_or_default();
    let mut ids = NodeIds::reserving(raw_groups);
    estimate.groups = raw_groups
        .iter()
        .enumerate()
        .map(|(i, g)| build_group(g, i, &mut ids))
        .collect();

    estimate.total = estimate.groups.iter().map(|g| g.item.amount).sum();
    estimate.spent = estimate.groups.iter().map(|g| g.item.spent).sum();
    estimate.balance = estimate.total - estimate.spent;

    estimate
}

/// Hands out ids for nodes that came without one
///
/// Every explicit id in the payload is reserved up front, so a positional id
/// never lands on a node the payload named itself.
struct NodeIds {
    taken: HashSet<String>,
}

impl NodeIds {
    fn reserving(groups: &[RawGroup]) -> Self {
        let mut taken = HashSet::new();
        for group in groups {
            taken.extend(group.item.identifier());
            for section in group.sections.as_deref().unwrap_or_default() {
                taken.extend(section.item.identifier());
                for subsection in section.subsections.as_deref().unwrap_or_default() {
                    taken.extend(subsection.item.identifier());
                }
            }
        }
        Self { taken }
    }

    fn assign(&mut self, raw: &RawLineItem, positional: String) -> NodeId {
        if let Some(explicit) = raw.identifier() {
            return NodeId::from(explicit);
        }

        let mut candidate = positional.clone();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{}~{}", positional, n);
            n += 1;
        }
        self.taken.insert(candidate.clone());
        NodeId::from(candidate)
    }
}

fn build_group(raw: &RawGroup, index: usize, ids: &mut NodeIds) -> Group {
    let id = ids.assign(&raw.item, format!("g{}", index + 1));
    let item = build_item(&raw.item, id);
    let sections = raw
        .sections
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(j, s)| build_section(s, &item.id, j, ids))
        .collect();
    Group { item, sections }
}

fn build_section(raw: &RawSection, group_id: &NodeId, index: usize, ids: &mut NodeIds) -> Section {
    let id = ids.assign(&raw.item, format!("{}.s{}", group_id, index + 1));
    let item = build_item(&raw.item, id);
    let subsections = raw
        .subsections
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(k, ss)| build_subsection(ss, group_id, &item.id, k, ids))
        .collect();
    Section {
        item,
        group_id: group_id.clone(),
        subsections,
    }
}

fn build_subsection(
    raw: &RawSubsection,
    group_id: &NodeId,
    section_id: &NodeId,
    index: usize,
    ids: &mut NodeIds,
) -> Subsection {
    let id = ids.assign(&raw.item, format!("{}.ss{}", section_id, index + 1));
    Subsection {
        item: build_item(&raw.item, id),
        group_id: group_id.clone(),
        section_id: section_id.clone(),
    }
}

fn build_item(raw: &RawLineItem, id: NodeId) -> LineItem {
    let mut item = LineItem::new(id, raw::text(raw.name.as_ref()));
    item.code = raw::text(raw.code.as_ref());
    item.description = raw::text(raw.description.as_ref());
    item.unit = raw::text(raw.unit.as_ref());
    item.quantity = raw::numeric_or_zero(raw.quantity.as_ref());
    item.rate = raw::numeric_or_zero(raw.rate.as_ref());

    item.declared_amount = match raw::numeric(raw.amount.as_ref()) {
        Some(explicit) => Money::from_decimal(explicit),
        None => item.extended_amount(),
    };
    item.spent = Money::from_decimal(raw::numeric_or_zero(raw.spent.as_ref()));
    item.settle_as_leaf();
    item
}
