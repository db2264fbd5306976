//! Allocate CLI command
//!
//! Restores a document's existing target, applies the requested changes
//! through the selector and records the result.

use clap::Args;

use crate::config::settings::Settings;
use crate::display::estimate::format_target;
use crate::error::{EstimateError, EstimateResult};
use crate::models::{
    AllocatedDocument, AllocationLevel, AllocationTarget, DocumentId, DocumentKind, Money, NodeId,
};
use crate::services::{plan_allocation, AllocationChange, AllocationRequest, AllocationService};
use crate::storage::Storage;

use super::estimate::load_estimate;

/// Arguments for `estimate allocate`
#[derive(Args)]
pub struct AllocateArgs {
    /// Payload file or stored estimate id
    pub estimate: String,

    /// Document kind (purchase-order, expense, wage, payslip, subcontractor-assignment)
    #[arg(short, long)]
    pub kind: DocumentKind,

    /// Document id; a new one is generated when omitted
    #[arg(short, long)]
    pub document: Option<DocumentId>,

    /// Document amount (e.g. "1250.00")
    #[arg(short, long)]
    pub amount: Option<Money>,

    /// The document's current target as JSON
    #[arg(long)]
    pub existing: Option<String>,

    /// Allocation level (estimate, group, section, subsection)
    #[arg(short, long)]
    pub level: Option<AllocationLevel>,

    #[arg(short, long)]
    pub group: Option<NodeId>,

    #[arg(short, long)]
    pub section: Option<NodeId>,

    #[arg(long)]
    pub subsection: Option<NodeId>,
}

/// Parse a persisted target passed on the command line
pub fn parse_existing_target(json: &str) -> EstimateResult<AllocationTarget> {
    serde_json::from_str(json)
        .map_err(|e| EstimateError::Validation(format!("Invalid --existing target: {}", e)))
}

pub fn handle_allocate(
    storage: &Storage,
    settings: &Settings,
    args: AllocateArgs,
) -> EstimateResult<()> {
    let estimate = load_estimate(storage, &args.estimate)?;
    let existing = args
        .existing
        .as_deref()
        .map(parse_existing_target)
        .transpose()?;

    let request = AllocationRequest {
        level: args.level,
        group_id: args.group,
        section_id: args.section,
        subsection_id: args.subsection,
    };
    let target = plan_allocation(
        estimate.clone(),
        existing.as_ref(),
        settings.default_allocation_level,
        &request,
    )?;

    let document = AllocatedDocument::new(
        args.kind,
        args.document.unwrap_or_else(DocumentId::new),
        args.amount.unwrap_or_default(),
        target,
    );

    let change = AllocationService::new(storage).record(&document, existing.as_ref())?;

    println!("{}", serde_json::to_string_pretty(&document)?);
    match change {
        AllocationChange::Created => {
            eprintln!(
                "Allocated {} to {}",
                document.audit_key(),
                format_target(&document.target, &estimate)
            );
        }
        AllocationChange::Updated { diff } => {
            eprintln!(
                "Moved {} to {}",
                document.audit_key(),
                format_target(&document.target, &estimate)
            );
            if let Some(diff) = diff {
                eprintln!("  Changes: {}", diff);
            }
        }
        AllocationChange::Unchanged => {
            eprintln!("{} unchanged", document.audit_key());
        }
    }

    Ok(())
}
