//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod allocate;
pub mod audit;
pub mod estimate;

pub use allocate::{handle_allocate, AllocateArgs};
pub use audit::{handle_audit, AuditArgs};
pub use estimate::{
    handle_commitments, handle_import, handle_locate, handle_resolve, handle_show,
    load_estimate, CommitmentsArgs, ImportArgs, LocateArgs, ResolveArgs, ShowArgs,
};
