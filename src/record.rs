//! Record model and the property-match filtering primitive.
//!
//! A `Record` is an immutable mapping from field name to scalar `Value`.
//! `matches_properties` / `filter_by_properties` implement the one
//! building block all cascade filtering is made of: keep the records
//! whose value for every constrained field equals at least one accepted
//! value for that field.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

// ─── Value ───────────────────────────────────────────────────────────────────

/// Scalar field value stored in a record.
///
/// `Other` absorbs nested JSON (arrays/objects) so records can carry
/// display payloads the filter never matches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Value {
    /// Canonical text form used for option lists and comparisons.
    ///
    /// Null and nested values have no text form: they never show up as
    /// options and never satisfy a constraint.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::Other(_) => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            Value::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One immutable item in the filterable collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion, for tests and inline datasets.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Canonical text form of a scalar field, if it has one.
    pub fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(Value::as_text)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ─── Property filtering ──────────────────────────────────────────────────────

/// One filtering constraint: a field name and the values accepted for it.
///
/// An accepted set that is empty, or contains only empty strings, imposes
/// no constraint at all (it never means "reject everything").
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFilter {
    pub field: String,
    pub accepted: Vec<String>,
}

impl PropertyFilter {
    pub fn new(field: impl Into<String>, accepted: Vec<String>) -> Self {
        Self {
            field: field.into(),
            accepted,
        }
    }
}

/// Does `record` satisfy every constraint in `filters`?
///
/// For each filter the record's text value must equal at least one
/// non-empty accepted entry. Empty accepted entries are skipped, so a
/// stray "nothing chosen" sentinel carried into the set cannot restrict
/// the result.
pub fn matches_properties(record: &Record, filters: &[PropertyFilter]) -> bool {
    filters.iter().all(|f| {
        let mut constrained = false;
        let text = record.text(&f.field);
        for accepted in &f.accepted {
            if accepted.is_empty() {
                continue;
            }
            constrained = true;
            if text.as_deref() == Some(accepted.as_str()) {
                return true;
            }
        }
        !constrained
    })
}

/// The subset of `records` matching every constraint in `filters`.
///
/// Pure and re-derived on every call; both per-node and whole-collection
/// filtering go through this.
pub fn filter_by_properties<'r>(
    records: impl IntoIterator<Item = &'r Record>,
    filters: &[PropertyFilter],
) -> Vec<&'r Record> {
    records
        .into_iter()
        .filter(|r| matches_properties(r, filters))
        .collect()
}

/// Distinct text values of `field` over `records`, sorted lexicographically.
///
/// Fields that are absent, null, or nested contribute nothing.
pub fn distinct_text_values<'r>(
    records: impl IntoIterator<Item = &'r Record>,
    field: &str,
) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for record in records {
        if let Some(text) = record.text(field) {
            seen.insert(text);
        }
    }
    seen.into_iter().collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
