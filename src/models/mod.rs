//! Core data models for EstimateCLI
//!
//! This module contains the data structures of the budget-estimate domain:
//! the estimate tree, its line items, money, identifiers, allocation targets
//! and the raw payload shapes the tree is built from.

pub mod allocation;
pub mod estimate;
pub mod ids;
pub mod line_item;
pub mod money;
pub mod raw;

pub use allocation::{AllocatedDocument, AllocationTarget, DocumentKind};
pub use estimate::{Estimate, FlatNode};
pub use ids::{DocumentId, EstimateId, NodeId, ProjectId};
pub use line_item::{AllocationLevel, Group, LineItem, NodeLevel, Section, Subsection};
pub use money::{Money, MoneyParseError};
pub use raw::{RawEstimate, RawGroup, RawLineItem, RawSection, RawSubsection};
