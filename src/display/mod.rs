//! Display formatting for terminal output
//!
//! Formats estimates, located nodes, allocation targets and commitment
//! summaries for the CLI.

pub mod estimate;

pub use estimate::{
    format_commitments, format_estimate_summary, format_estimate_table, format_node_path,
    format_target,
};
