//! Audit CLI command
//!
//! Prints recent audit log entries, oldest first.

use clap::Args;

use crate::error::EstimateResult;
use crate::storage::Storage;

/// Arguments for `estimate audit`
#[derive(Args)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

pub fn handle_audit(storage: &Storage, args: AuditArgs) -> EstimateResult<()> {
    let audit = storage.audit();
    if !audit.exists() {
        println!("No audit entries yet.");
        return Ok(());
    }

    let entries = audit.read_recent(args.limit)?;
    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!(
        "Showing {} of {} entries ({})",
        entries.len(),
        audit.entry_count()?,
        audit.path().display()
    );
    Ok(())
}
