//! Rollup aggregator
//!
//! Recomputes amount, spent and balance bottom-up. A node with children
//! always takes its amount and spent from them, whatever the source said; a
//! node without children keeps its declared amount and its own spent.
//! Balance is `amount - spent` at every level and is never summed.

use crate::models::{Estimate, Group, Money, Section};

/// Aggregate an estimate, returning a new tree
///
/// Idempotent: `aggregate(&aggregate(e)) == aggregate(e)`.
pub fn aggregate(estimate: &Estimate) -> Estimate {
    let mut rolled = estimate.clone();
    aggregate_in_place(&mut rolled);
    rolled
}

/// Aggregate an owned estimate without cloning it
pub fn aggregate_owned(mut estimate: Estimate) -> Estimate {
    aggregate_in_place(&mut estimate);
    estimate
}

fn aggregate_in_place(estimate: &mut Estimate) {
    for group in &mut estimate.groups {
        roll_group(group);
    }

    estimate.total = estimate.groups.iter().map(|g| g.item.amount).sum();
    estimate.spent = estimate.groups.iter().map(|g| g.item.spent).sum();
    estimate.balance = estimate.total - estimate.spent;
}

fn roll_group(group: &mut Group) {
    for section in &mut group.sections {
        roll_section(section);
    }

    if group.sections.is_empty() {
        group.item.settle_as_leaf();
    } else {
        let (amount, spent) = totals(group.sections.iter().map(|s| (s.item.amount, s.item.spent)));
        group.item.settle_from_children(amount, spent);
    }
}

fn roll_section(section: &mut Section) {
    for subsection in &mut section.subsections {
        subsection.item.settle_as_leaf();
    }

    if section.subsections.is_empty() {
        section.item.settle_as_leaf();
    } else {
        let (amount, spent) = totals(
            section
                .subsections
                .iter()
                .map(|s| (s.item.amount, s.item.spent)),
        );
        section.item.settle_from_children(amount, spent);
    }
}

fn totals(children: impl Iterator<Item = (Money, Money)>) -> (Money, Money) {
    children.fold((Money::zero(), Money::zero()), |(amount, spent), (a, s)| {
        (amount + a, spent + s)
    })
}
