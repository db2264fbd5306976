//! Service layer for EstimateCLI
//!
//! Builds the estimate tree from raw payloads, rolls it up, resolves
//! allocation targets and drives the allocation selector. Everything except
//! [`estimate`] loading and [`allocation`] recording is pure.

pub mod allocation;
pub mod commitments;
pub mod estimate;
pub mod hierarchy;
pub mod resolver;
pub mod rollup;
pub mod selector;

pub use allocation::{plan_allocation, AllocationChange, AllocationRequest, AllocationService};
pub use commitments::{summarize_commitments, CommitmentSummary, RejectedDocument};
pub use estimate::{import_estimate, load_from_path, EstimateService};
pub use hierarchy::build;
pub use resolver::{locate, resolve_target, validate_target, NodePath, Selection};
pub use rollup::{aggregate, aggregate_owned};
pub use selector::{initial_state, transition, AllocationSelector, SelectorEvent, SelectorState};
