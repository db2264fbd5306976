//! Audit logging for EstimateCLI
//!
//! Records allocation changes with before/after values in an append-only,
//! line-delimited JSON log.
//!
//! # Example
//!
//! ```rust,ignore
//! use estimate_cli::audit::{AuditEntry, AuditLogger, EntityType, generate_diff};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::update(
//!     EntityType::Allocation,
//!     "purchase-order:PO-12",
//!     None,
//!     &before,
//!     &after,
//!     generate_diff(&before_json, &after_json),
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
