//! EstimateCLI - Construction budget estimates from the terminal
//!
//! This library turns raw estimate payloads into a Group → Section →
//! Subsection tree, rolls costs up the tree, and resolves where purchase
//! orders, expenses, wages, payslips and subcontractor assignments are
//! charged.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (estimate tree, money, allocation targets)
//! - `storage`: JSON payload sources
//! - `services`: Hierarchy builder, rollup, resolver and allocation selector
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `estimate` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use estimate_cli::services::{aggregate, build, locate};
//!
//! let raw = estimate_cli::storage::read_raw_estimate(path)?;
//! let estimate = aggregate(&build(&raw));
//! let path = locate(&estimate, &"ss3".into())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::EstimateError;
