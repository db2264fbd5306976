//! Line items and the three fixed levels of an estimate
//!
//! Groups, sections and subsections share the same costed shape
//! ([`LineItem`]) but are distinct types, so a section can never be walked
//! as if it were a subsection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::NodeId;
use super::money::Money;

/// The level an allocation can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AllocationLevel {
    /// The whole estimate
    Estimate,
    Group,
    Section,
    #[default]
    Subsection,
}

impl AllocationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Estimate => "estimate",
            Self::Group => "group",
            Self::Section => "section",
            Self::Subsection => "subsection",
        }
    }

    /// The node level for this allocation level, if it names a node
    pub fn node_level(&self) -> Option<NodeLevel> {
        match self {
            Self::Estimate => None,
            Self::Group => Some(NodeLevel::Group),
            Self::Section => Some(NodeLevel::Section),
            Self::Subsection => Some(NodeLevel::Subsection),
        }
    }
}

impl fmt::Display for AllocationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AllocationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "estimate" => Ok(Self::Estimate),
            "group" => Ok(Self::Group),
            "section" => Ok(Self::Section),
            "subsection" => Ok(Self::Subsection),
            other => Err(format!("Unknown allocation level: {}", other)),
        }
    }
}

/// The level of a node inside the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLevel {
    Group,
    Section,
    Subsection,
}

impl NodeLevel {
    pub fn allocation_level(&self) -> AllocationLevel {
        match self {
            Self::Group => AllocationLevel::Group,
            Self::Section => AllocationLevel::Section,
            Self::Subsection => AllocationLevel::Subsection,
        }
    }
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.allocation_level())
    }
}

/// A costed unit of work
///
/// `declared_amount` is what the source said the line costs (or
/// `rate * quantity` when it said nothing). `amount` is the figure after
/// rollup; for nodes without children the two are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: NodeId,

    /// Display code, not necessarily unique
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub quantity: Decimal,

    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub rate: Decimal,

    pub declared_amount: Money,

    pub amount: Money,

    pub spent: Money,

    pub balance: Money,
}

impl LineItem {
    /// Create an empty line item
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: String::new(),
            name: name.into(),
            description: String::new(),
            quantity: Decimal::ZERO,
            unit: String::new(),
            rate: Decimal::ZERO,
            declared_amount: Money::zero(),
            amount: Money::zero(),
            spent: Money::zero(),
            balance: Money::zero(),
        }
    }

    /// `rate * quantity`, rounded to cents
    pub fn extended_amount(&self) -> Money {
        self.rate
            .checked_mul(self.quantity)
            .map(Money::from_decimal)
            .unwrap_or_default()
    }

    /// Declared amount minus rolled-up amount
    pub fn variance(&self) -> Money {
        self.declared_amount - self.amount
    }

    /// Set figures for a node with nothing beneath it
    pub(crate) fn settle_as_leaf(&mut self) {
        self.amount = self.declared_amount;
        self.balance = self.amount - self.spent;
    }

    /// Set figures from child totals
    pub(crate) fn settle_from_children(&mut self, amount: Money, spent: Money) {
        self.amount = amount;
        self.spent = spent;
        self.balance = amount - spent;
    }

    /// Label used in listings: "code name" or just the name
    pub fn label(&self) -> String {
        if self.code.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.code, self.name)
        }
    }
}

/// Finest level; has no children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    #[serde(flatten)]
    pub item: LineItem,

    pub group_id: NodeId,

    pub section_id: NodeId,
}

/// Middle level, owning subsections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(flatten)]
    pub item: LineItem,

    pub group_id: NodeId,

    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

impl Section {
    pub fn find_subsection(&self, id: &NodeId) -> Option<&Subsection> {
        self.subsections.iter().find(|s| &s.item.id == id)
    }
}

/// Coarsest level, owning sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(flatten)]
    pub item: LineItem,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Group {
    pub fn find_section(&self, id: &NodeId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.item.id == id)
    }
}
