//! Estimate display formatting
//!
//! Renders the rolled-up tree as a table, plus the detail views for located
//! nodes, allocation targets and commitment summaries.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::config::settings::Settings;
use crate::models::{AllocationLevel, AllocationTarget, Estimate, FlatNode, Money, NodeLevel};
use crate::services::commitments::CommitmentSummary;
use crate::services::resolver::NodePath;

/// Format the estimate header: name, status, date and totals
pub fn format_estimate_summary(estimate: &Estimate, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    let mut output = String::new();

    let title = if estimate.name.is_empty() {
        format!("Estimate {}", estimate.estimate_id)
    } else {
        format!("{} ({})", estimate.name, estimate.estimate_id)
    };
    output.push_str(&format!("{}\n", title));
    output.push_str(&format!("{}\n", "=".repeat(title.chars().count())));

    if !estimate.project_id.is_blank() {
        output.push_str(&format!("Project:  {}\n", estimate.project_id));
    }
    if !estimate.status.is_empty() {
        output.push_str(&format!("Status:   {}\n", estimate.status));
    }
    if let Some(date) = estimate.date {
        output.push_str(&format!("Date:     {}\n", date.format(&settings.date_format)));
    }

    output.push_str(&format!(
        "Total:    {}\n",
        estimate.total.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Spent:    {}\n",
        estimate.spent.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Balance:  {}\n",
        estimate.balance.format_with_symbol(symbol)
    ));

    output
}

/// Format every node as one table row, indented by depth
pub fn format_estimate_table(estimate: &Estimate, settings: &Settings) -> String {
    if estimate.is_empty() {
        return "No budget lines in this estimate.".to_string();
    }

    let symbol = settings.currency_symbol.as_str();
    let mut builder = Builder::default();

    let mut header = vec![
        "Level", "Code", "Name", "Qty", "Unit", "Rate", "Amount", "Spent", "Balance",
    ];
    if settings.show_variance {
        header.extend(["Declared", "Variance"]);
    }
    builder.push_record(header);

    for node in estimate.flatten() {
        builder.push_record(node_row(&node, symbol, settings.show_variance));
    }

    let mut totals = vec![
        "Estimate".to_string(),
        String::new(),
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        estimate.total.format_with_symbol(symbol),
        estimate.spent.format_with_symbol(symbol),
        estimate.balance.format_with_symbol(symbol),
    ];
    if settings.show_variance {
        totals.extend([String::new(), String::new()]);
    }
    builder.push_record(totals);

    builder
        .build()
        .with(Style::psql())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string()
}

fn node_row(node: &FlatNode<'_>, symbol: &str, show_variance: bool) -> Vec<String> {
    let item = node.item;
    let indent = "  ".repeat(node.depth());

    let mut row = vec![
        format!("{}{}", indent, node.level),
        item.code.clone(),
        format!("{}{}", indent, item.label()),
        format_quantity(item.quantity),
        item.unit.clone(),
        if item.rate.is_zero() {
            String::new()
        } else {
            Money::from_decimal(item.rate).format_with_symbol(symbol)
        },
        item.amount.format_with_symbol(symbol),
        item.spent.format_with_symbol(symbol),
        item.balance.format_with_symbol(symbol),
    ];

    if show_variance {
        let variance = item.variance();
        row.push(item.declared_amount.format_with_symbol(symbol));
        row.push(if variance.is_zero() {
            String::new()
        } else {
            variance.format_with_symbol(symbol)
        });
    }

    row
}

fn format_quantity(quantity: rust_decimal::Decimal) -> String {
    if quantity.is_zero() {
        String::new()
    } else {
        quantity.normalize().to_string()
    }
}

/// Format a located node with its ancestry
pub fn format_node_path(path: &NodePath, estimate: &Estimate, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    let mut output = String::new();

    output.push_str(&format!("Type:        {}\n", path.level));

    if let Some(group) = estimate.find_group(&path.group_id) {
        output.push_str(&format!(
            "Group:       {} [{}]\n",
            group.item.label(),
            path.group_id
        ));
    }
    if let Some(section) = path.section_id.as_ref().and_then(|id| estimate.find_section(id)) {
        output.push_str(&format!(
            "Section:     {} [{}]\n",
            section.item.label(),
            section.item.id
        ));
    }
    if let Some(subsection) = path
        .subsection_id
        .as_ref()
        .and_then(|id| estimate.find_subsection(id))
    {
        output.push_str(&format!(
            "Subsection:  {} [{}]\n",
            subsection.item.label(),
            subsection.item.id
        ));
    }

    if let Some(item) = node_item(estimate, path) {
        output.push_str(&format!(
            "Amount:      {}\n",
            item.amount.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Spent:       {}\n",
            item.spent.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Balance:     {}\n",
            item.balance.format_with_symbol(symbol)
        ));
    }

    output
}

fn node_item<'a>(estimate: &'a Estimate, path: &NodePath) -> Option<&'a crate::models::LineItem> {
    match path.level {
        NodeLevel::Group => estimate.find_group(path.node_id()).map(|g| &g.item),
        NodeLevel::Section => estimate.find_section(path.node_id()).map(|s| &s.item),
        NodeLevel::Subsection => estimate.find_subsection(path.node_id()).map(|ss| &ss.item),
    }
}

/// Describe an allocation target in terms of the estimate's names
pub fn format_target(target: &AllocationTarget, estimate: &Estimate) -> String {
    let label = match (target.level, &target.target_id) {
        (AllocationLevel::Group, Some(id)) => estimate.find_group(id).map(|g| g.item.label()),
        (AllocationLevel::Section, Some(id)) => estimate.find_section(id).map(|s| s.item.label()),
        (AllocationLevel::Subsection, Some(id)) => {
            estimate.find_subsection(id).map(|ss| ss.item.label())
        }
        _ => None,
    };

    match label {
        Some(label) => format!("{} ({})", target, label),
        None if target.is_whole_estimate() && !estimate.name.is_empty() => {
            format!("{} ({})", target, estimate.name)
        }
        None => target.to_string(),
    }
}

/// Format committed amounts against each node's rolled-up amount
pub fn format_commitments(
    summary: &CommitmentSummary,
    estimate: &Estimate,
    settings: &Settings,
) -> String {
    let symbol = settings.currency_symbol.as_str();
    let mut builder = Builder::default();
    builder.push_record(["Level", "Name", "Amount", "Committed", "Uncommitted"]);

    for node in estimate.flatten() {
        let committed = summary.committed_for(&node.item.id);
        builder.push_record([
            format!("{}{}", "  ".repeat(node.depth()), node.level),
            node.item.label(),
            node.item.amount.format_with_symbol(symbol),
            committed.format_with_symbol(symbol),
            (node.item.amount - committed).format_with_symbol(symbol),
        ]);
    }

    builder.push_record([
        "Estimate".to_string(),
        "Total".to_string(),
        estimate.total.format_with_symbol(symbol),
        summary.estimate_committed.format_with_symbol(symbol),
        (estimate.total - summary.estimate_committed).format_with_symbol(symbol),
    ]);

    let mut output = builder
        .build()
        .with(Style::psql())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string();

    output.push_str(&format!(
        "\n\n{} document(s) counted, {} rejected\n",
        summary.accepted,
        summary.rejected.len()
    ));
    for rejected in &summary.rejected {
        output.push_str(&format!(
            "  {} -> {}: {}\n",
            rejected.document.audit_key(),
            rejected.document.target,
            rejected.reason
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocatedDocument, DocumentKind, RawEstimate};
    use crate::services::commitments::summarize_commitments;
    use crate::services::resolver::locate;
    use crate::services::{aggregate, build};
    use serde_json::json;

    fn estimate() -> Estimate {
        let raw: RawEstimate = serde_json::from_value(json!({
            "estimateId": "est-1",
            "name": "Block B",
            "status": "approved",
            "date": "2024-03-01",
            "groups": [{
                "id": "g1",
                "code": "A",
                "name": "Substructure",
                "amount": 500,
                "sections": [{
                    "id": "s1",
                    "name": "Excavation",
                    "subsections": [
                        {"id": "ss1", "name": "Trenching", "amount": 100, "spent": 40},
                        {"id": "ss2", "name": "Backfill", "quantity": 10, "unit": "m3",
                         "rate": 20, "spent": 60}
                    ]
                }]
            }]
        }))
        .unwrap();
        aggregate(&build(&raw))
    }

    #[test]
    fn test_summary() {
        let output = format_estimate_summary(&estimate(), &Settings::default());
        assert!(output.contains("Block B (est-1)"));
        assert!(output.contains("Status:   approved"));
        assert!(output.contains("Date:     2024-03-01"));
        assert!(output.contains("Total:    $300.00"));
        assert!(output.contains("Balance:  $200.00"));
    }

    #[test]
    fn test_table_lists_every_node() {
        let output = format_estimate_table(&estimate(), &Settings::default());
        assert!(output.contains("Substructure"));
        assert!(output.contains("Excavation"));
        assert!(output.contains("Trenching"));
        assert!(output.contains("Backfill"));
        assert!(output.contains("Variance"));
        assert!(output.contains("$500.00"));
        assert!(output.contains("$200.00"));
    }

    #[test]
    fn test_table_without_variance() {
        let settings = Settings {
            show_variance: false,
            currency_symbol: "€".into(),
            ..Settings::default()
        };
        let output = format_estimate_table(&estimate(), &settings);
        assert!(!output.contains("Variance"));
        assert!(output.contains("€300.00"));
    }

    #[test]
    fn test_empty_table() {
        let output = format_estimate_table(&Estimate::new("e", "p"), &Settings::default());
        assert_eq!(output, "No budget lines in this estimate.");
    }

    #[test]
    fn test_node_path() {
        let estimate = estimate();
        let path = locate(&estimate, &"ss2".into()).unwrap();
        let output = format_node_path(&path, &estimate, &Settings::default());

        assert!(output.contains("Type:        subsection"));
        assert!(output.contains("[g1]"));
        assert!(output.contains("Section:     Excavation [s1]"));
        assert!(output.contains("Amount:      $200.00"));
    }

    #[test]
    fn test_format_target() {
        let estimate = estimate();
        assert_eq!(
            format_target(&AllocationTarget::section("est-1", "s1"), &estimate),
            "est-1/section:s1 (Excavation)"
        );
        assert_eq!(
            format_target(&AllocationTarget::estimate("est-1"), &estimate),
            "est-1/estimate (Block B)"
        );
    }

    #[test]
    fn test_commitments() {
        let estimate = estimate();
        let docs = vec![
            AllocatedDocument::new(
                DocumentKind::Expense,
                "EX-1",
                Money::from_cents(2_500),
                AllocationTarget::subsection("est-1", "ss1"),
            ),
            AllocatedDocument::new(
                DocumentKind::Wage,
                "W-1",
                Money::from_cents(100),
                AllocationTarget::group("est-1", "gone"),
            ),
        ];
        let summary = summarize_commitments(&estimate, &docs);
        let output = format_commitments(&summary, &estimate, &Settings::default());

        assert!(output.contains("$25.00"));
        assert!(output.contains("1 document(s) counted, 1 rejected"));
        assert!(output.contains("wage:W-1"));
    }
}
