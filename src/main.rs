use anyhow::Result;
use clap::{Parser, Subcommand};

use estimate_cli::cli::{
    handle_allocate, handle_audit, handle_commitments, handle_import, handle_locate,
    handle_resolve, handle_show, AllocateArgs, AuditArgs, CommitmentsArgs, ImportArgs,
    LocateArgs, ResolveArgs, ShowArgs,
};
use estimate_cli::config::{paths::EstimatePaths, settings::Settings};
use estimate_cli::storage::Storage;

#[derive(Parser)]
#[command(
    name = "estimate",
    version,
    about = "Construction budget estimates and cost allocation",
    long_about = "EstimateCLI reads project budget estimates, rolls costs up the \
                  Group > Section > Subsection tree, and decides which budget line \
                  a purchase order, expense, wage, payslip or subcontractor \
                  assignment is charged to."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an aggregated estimate
    Show(ShowArgs),

    /// Find where a node sits in an estimate
    Locate(LocateArgs),

    /// Turn a level and selection into an allocation target
    Resolve(ResolveArgs),

    /// Allocate a document to a budget line
    Allocate(AllocateArgs),

    /// Store an estimate payload so it can be used by id
    Import(ImportArgs),

    /// Summarize document commitments against an estimate
    Commitments(CommitmentsArgs),

    /// Show recent audit log entries
    Audit(AuditArgs),

    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = EstimatePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Show(args)) => handle_show(&storage, &settings, args)?,
        Some(Commands::Locate(args)) => handle_locate(&storage, &settings, args)?,
        Some(Commands::Resolve(args)) => handle_resolve(&storage, args)?,
        Some(Commands::Allocate(args)) => handle_allocate(&storage, &settings, args)?,
        Some(Commands::Import(args)) => handle_import(&storage, args)?,
        Some(Commands::Commitments(args)) => handle_commitments(&storage, &settings, args)?,
        Some(Commands::Audit(args)) => handle_audit(&storage, args)?,
        Some(Commands::Init) => {
            println!("Initializing EstimateCLI at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Estimate payloads: {}", paths.estimates_dir().display());
            println!("Run 'estimate import <FILE>' to store an estimate.");
        }
        Some(Commands::Config) => {
            println!("EstimateCLI Configuration");
            println!("=========================");
            println!("Base directory:      {}", paths.base_dir().display());
            println!("Estimates directory: {}", paths.estimates_dir().display());
            println!("Settings file:       {}", paths.settings_file().display());
            println!("Audit log:           {}", paths.audit_log().display());
            println!("Initialized:         {}", storage.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  Allocation level:  {}", settings.default_allocation_level);
            println!("  Show variance:     {}", settings.show_variance);
        }
        None => {
            println!("EstimateCLI - Construction budget estimates");
            println!();
            println!("Run 'estimate --help' for usage information.");
        }
    }

    Ok(())
}
