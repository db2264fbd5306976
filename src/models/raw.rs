//! Inbound estimate payloads
//!
//! These mirror what the backend sends: camelCase keys, `_id` or `id`,
//! ids that may be numbers, numbers that may be strings, and child arrays
//! that may be missing or null. Every field is optional; interpretation
//! happens in the hierarchy builder.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Fields shared by every level of the raw tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLineItem {
    pub id: Option<Value>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<Value>,
    pub code: Option<Value>,
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub quantity: Option<Value>,
    pub unit: Option<Value>,
    pub rate: Option<Value>,
    pub amount: Option<Value>,
    pub spent: Option<Value>,
}

impl RawLineItem {
    /// The node id, preferring `id` over `_id`
    pub fn identifier(&self) -> Option<String> {
        identifier(self.id.as_ref()).or_else(|| identifier(self.mongo_id.as_ref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSubsection {
    #[serde(flatten)]
    pub item: RawLineItem,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSection {
    #[serde(flatten)]
    pub item: RawLineItem,
    pub subsections: Option<Vec<RawSubsection>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGroup {
    #[serde(flatten)]
    pub item: RawLineItem,
    pub sections: Option<Vec<RawSection>>,
}

/// An estimate as fetched from the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEstimate {
    pub estimate_id: Option<Value>,
    pub id: Option<Value>,
    #[serde(rename = "_id")]
    pub mongo_id: Option<Value>,
    pub project_id: Option<Value>,
    pub name: Option<Value>,
    pub status: Option<Value>,
    pub date: Option<Value>,
    pub groups: Option<Vec<RawGroup>>,
}

impl RawEstimate {
    /// The estimate id, preferring `estimateId`, then `id`, then `_id`
    pub fn identifier(&self) -> Option<String> {
        identifier(self.estimate_id.as_ref())
            .or_else(|| identifier(self.id.as_ref()))
            .or_else(|| identifier(self.mongo_id.as_ref()))
    }
}

/// Read an identifier that may be a string or a number
pub fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read display text; numbers are rendered, anything else is empty
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Read a numeric field leniently
///
/// Returns `None` when the field is absent, null or a blank string. Values
/// that are present but not numeric read as zero.
pub fn numeric(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Null => None,
        Value::Number(n) => Some(parse_decimal(&n.to_string())),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(parse_decimal(s)),
        _ => Some(Decimal::ZERO),
    }
}

/// Read a numeric field, treating absence as zero
pub fn numeric_or_zero(value: Option<&Value>) -> Decimal {
    numeric(value).unwrap_or(Decimal::ZERO)
}

/// Parse "1,250.50", "$ 300", "1e3" and the like; anything else is zero
pub fn parse_decimal(input: &str) -> Decimal {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | ' ' | '_'))
        .collect();
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// Read a date given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn date(value: Option<&Value>) -> Option<NaiveDate> {
    let Some(Value::String(s)) = value else {
        return None;
    };
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
