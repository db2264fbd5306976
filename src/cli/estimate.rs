//! Estimate CLI commands
//!
//! Show, locate, resolve, import and commitment commands. Each takes an
//! estimate as either a payload file or a stored estimate id.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::settings::Settings;
use crate::display::estimate::{
    format_commitments, format_estimate_summary, format_estimate_table, format_node_path,
    format_target,
};
use crate::error::EstimateResult;
use crate::models::{AllocatedDocument, AllocationLevel, Estimate, EstimateId, NodeId};
use crate::services::{
    import_estimate, load_from_path, locate, resolve_target, summarize_commitments,
    EstimateService, Selection,
};
use crate::storage::{read_json_required, read_raw_estimate, Storage};

/// Load an estimate from a payload file, or by id from the data directory
pub fn load_estimate(storage: &Storage, input: &str) -> EstimateResult<Estimate> {
    let path = Path::new(input);
    if path.is_file() {
        return load_from_path(path);
    }

    EstimateService::new(&storage.estimates).load(&EstimateId::from(input))
}

/// Arguments for `estimate show`
#[derive(Args)]
pub struct ShowArgs {
    /// Payload file or stored estimate id
    pub estimate: String,

    /// Print the aggregated estimate as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `estimate locate`
#[derive(Args)]
pub struct LocateArgs {
    /// Payload file or stored estimate id
    pub estimate: String,

    /// Id of a group, section or subsection
    pub node: NodeId,

    /// Print the node path as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `estimate resolve`
#[derive(Args)]
pub struct ResolveArgs {
    /// Payload file or stored estimate id
    pub estimate: String,

    /// Allocation level (estimate, group, section, subsection)
    #[arg(short, long)]
    pub level: AllocationLevel,

    #[arg(short, long)]
    pub group: Option<NodeId>,

    #[arg(short, long)]
    pub section: Option<NodeId>,

    #[arg(long)]
    pub subsection: Option<NodeId>,
}

/// Arguments for `estimate import`
#[derive(Args)]
pub struct ImportArgs {
    /// Payload file to store
    pub file: PathBuf,

    /// Store under this id instead of the payload's own
    #[arg(long)]
    pub id: Option<EstimateId>,
}

/// Arguments for `estimate commitments`
#[derive(Args)]
pub struct CommitmentsArgs {
    /// Payload file or stored estimate id
    pub estimate: String,

    /// JSON file holding an array of allocated documents
    pub documents: PathBuf,
}

pub fn handle_show(storage: &Storage, settings: &Settings, args: ShowArgs) -> EstimateResult<()> {
    let estimate = load_estimate(storage, &args.estimate)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("{}", format_estimate_summary(&estimate, settings));
    println!("{}", format_estimate_table(&estimate, settings));
    Ok(())
}

pub fn handle_locate(
    storage: &Storage,
    settings: &Settings,
    args: LocateArgs,
) -> EstimateResult<()> {
    let estimate = load_estimate(storage, &args.estimate)?;
    let path = locate(&estimate, &args.node)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&path)?);
    } else {
        print!("{}", format_node_path(&path, &estimate, settings));
    }
    Ok(())
}

pub fn handle_resolve(storage: &Storage, args: ResolveArgs) -> EstimateResult<()> {
    let estimate = load_estimate(storage, &args.estimate)?;
    let selection = Selection::new(args.group, args.section, args.subsection);
    let target = resolve_target(&estimate, args.level, &selection)?;

    println!("{}", serde_json::to_string_pretty(&target)?);
    eprintln!("Resolved: {}", format_target(&target, &estimate));
    Ok(())
}

pub fn handle_import(storage: &Storage, args: ImportArgs) -> EstimateResult<()> {
    let raw = read_raw_estimate(&args.file)?;
    let estimate = import_estimate(storage, &raw, args.id)?;

    println!("Imported estimate: {}", estimate.estimate_id);
    println!("  Nodes: {}", estimate.node_count());
    println!("  Total: {}", estimate.total);
    Ok(())
}

pub fn handle_commitments(
    storage: &Storage,
    settings: &Settings,
    args: CommitmentsArgs,
) -> EstimateResult<()> {
    let estimate = load_estimate(storage, &args.estimate)?;
    let documents: Vec<AllocatedDocument> = read_json_required(&args.documents)?;

    let summary = summarize_commitments(&estimate, &documents);
    print!("{}", format_commitments(&summary, &estimate, settings));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::EstimatePaths;
    use tempfile::TempDir;

    #[test]
    fn test_load_estimate_by_path_or_id() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(EstimatePaths::with_base_dir(temp_dir.path().join("home"))).unwrap();

        let file = temp_dir.path().join("payload.json");
        std::fs::write(&file, r#"{"estimateId": "est-7", "groups": [{"id": "g1"}]}"#).unwrap();

        let from_file = load_estimate(&storage, file.to_str().unwrap()).unwrap();
        assert_eq!(from_file.estimate_id.as_str(), "est-7");

        let raw = read_raw_estimate(&file).unwrap();
        import_estimate(&storage, &raw, None).unwrap();
        let by_id = load_estimate(&storage, "est-7").unwrap();
        assert_eq!(by_id, from_file);

        assert!(load_estimate(&storage, "missing").unwrap_err().is_not_found());
    }
}
