// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event patterns for routing rules
//!
//! A pattern constrains `source`, optionally `detail-type`, and any nested
//! field under `detail`. Each constrained field lists the values it accepts;
//! an event field matches when it equals one of them (or, for array fields,
//! when any element does).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors from parsing or validating an event pattern
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pattern must list at least one source")]
    EmptySource,
    #[error("pattern field {0} has no values")]
    EmptyValues(String),
}

/// Filter on one field of the event detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldFilter {
    Values(Vec<Value>),
    Nested(BTreeMap<String, FieldFilter>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventPattern {
    pub source: Vec<String>,
    #[serde(rename = "detail-type", default, skip_serializing_if = "Vec::is_empty")]
    pub detail_type: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detail: BTreeMap<String, FieldFilter>,
}

impl EventPattern {
    /// Pattern matching every event from one source
    pub fn for_source(source: &str) -> Self {
        Self {
            source: vec![source.to_string()],
            ..Self::default()
        }
    }

    pub fn with_detail_type(mut self, detail_type: &str) -> Self {
        self.detail_type.push(detail_type.to_string());
        self
    }

    /// Accept `value` for the top-level detail field `key`
    pub fn with_detail_value(mut self, key: &str, value: &str) -> Self {
        let filter = self
            .detail
            .entry(key.to_string())
            .or_insert_with(|| FieldFilter::Values(Vec::new()));
        match filter {
            FieldFilter::Values(values) => values.push(Value::String(value.to_string())),
            FieldFilter::Nested(_) => {
                *filter = FieldFilter::Values(vec![Value::String(value.to_string())]);
            }
        }
        self
    }

    pub fn to_json(&self) -> Result<String, PatternError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a pattern document
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let pattern: EventPattern = serde_json::from_str(text)?;
        if pattern.source.is_empty() {
            return Err(PatternError::EmptySource);
        }
        if let Some(field) = pattern
            .constraints()
            .into_iter()
            .find_map(|(field, values)| values.is_empty().then_some(field))
        {
            return Err(PatternError::EmptyValues(field));
        }
        Ok(pattern)
    }

    /// Flattened view: field path to the set of accepted values (as JSON text)
    pub fn constraints(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut out = BTreeMap::new();
        out.insert("source".to_string(), string_set(&self.source));
        if !self.detail_type.is_empty() {
            out.insert("detail-type".to_string(), string_set(&self.detail_type));
        }
        flatten("detail", &self.detail, &mut out);
        out
    }

    /// True if every event `other` accepts is also accepted here, and `other`
    /// constrains strictly more fields
    pub fn is_broader_than(&self, other: &EventPattern) -> bool {
        let mine = self.constraints();
        let theirs = other.constraints();
        mine.len() < theirs.len()
            && mine.iter().all(|(field, accepted)| {
                theirs
                    .get(field)
                    .is_some_and(|narrower| narrower.is_subset(accepted))
            })
    }

    /// Evaluate the pattern against an event envelope
    pub fn matches(&self, event: &Value) -> bool {
        let Some(envelope) = event.as_object() else {
            return false;
        };
        string_matches(envelope.get("source"), &self.source)
            && (self.detail_type.is_empty()
                || string_matches(envelope.get("detail-type"), &self.detail_type))
            && nested_matches(envelope.get("detail"), &self.detail)
    }
}

fn string_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| Value::String(v.clone()).to_string())
        .collect()
}

fn flatten(
    prefix: &str,
    filters: &BTreeMap<String, FieldFilter>,
    out: &mut BTreeMap<String, BTreeSet<String>>,
) {
    for (key, filter) in filters {
        let path = format!("{}.{}", prefix, key);
        match filter {
            FieldFilter::Values(values) => {
                out.insert(path, values.iter().map(Value::to_string).collect());
            }
            FieldFilter::Nested(inner) => flatten(&path, inner, out),
        }
    }
}

fn string_matches(field: Option<&Value>, accepted: &[String]) -> bool {
    match field {
        Some(Value::String(s)) => accepted.iter().any(|a| a == s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| accepted.iter().any(|a| a == s)),
        _ => false,
    }
}

fn values_match(field: Option<&Value>, accepted: &[Value]) -> bool {
    match field {
        None => false,
        Some(Value::Array(items)) => items.iter().any(|v| accepted.contains(v)),
        Some(v) => accepted.contains(v),
    }
}

fn nested_matches(field: Option<&Value>, filters: &BTreeMap<String, FieldFilter>) -> bool {
    if filters.is_empty() {
        return true;
    }
    let Some(object) = field.and_then(Value::as_object) else {
        return false;
    };
    filters.iter().all(|(key, filter)| match filter {
        FieldFilter::Values(accepted) => values_match(object.get(key), accepted),
        FieldFilter::Nested(inner) => nested_matches(object.get(key), inner),
    })
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
