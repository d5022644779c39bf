// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource inputs and outputs
//!
//! An [`Input`] is either a literal value or a reference to an attribute of
//! another declared resource. References are what make up the edges of the
//! resource graph: a resource cannot be applied until every resource it
//! references has outputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute a resource exposes after it has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Id,
    Name,
    Arn,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Attribute::Id => "id",
            Attribute::Name => "name",
            Attribute::Arn => "arn",
        };
        write!(f, "{}", s)
    }
}

/// Reference to one attribute of a declared resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttrRef {
    pub resource: String,
    pub attribute: Attribute,
}

impl AttrRef {
    pub fn new(resource: impl Into<String>, attribute: Attribute) -> Self {
        Self {
            resource: resource.into(),
            attribute,
        }
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.attribute)
    }
}

/// A resource input: known now, or known once another resource is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Value(String),
    Ref(AttrRef),
}

impl Input {
    pub fn value(value: impl Into<String>) -> Self {
        Input::Value(value.into())
    }

    /// The literal value, if this input is already known
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Input::Value(v) => Some(v),
            Input::Ref(_) => None,
        }
    }

    /// The referenced attribute, if this input is not yet known
    pub fn reference(&self) -> Option<&AttrRef> {
        match self {
            Input::Value(_) => None,
            Input::Ref(r) => Some(r),
        }
    }

    /// Replace a reference with its value
    ///
    /// Returns the unresolvable reference if `lookup` has no value for it.
    pub fn resolve<F>(&self, lookup: &F) -> Result<Input, AttrRef>
    where
        F: Fn(&AttrRef) -> Option<String>,
    {
        match self {
            Input::Value(v) => Ok(Input::Value(v.clone())),
            Input::Ref(r) => lookup(r).map(Input::Value).ok_or_else(|| r.clone()),
        }
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Value(value.to_string())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Value(value)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Value(v) => write!(f, "{}", v),
            Input::Ref(r) => write!(f, "${{{}}}", r),
        }
    }
}

/// Attributes assigned by the provider once a resource exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOutputs {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

impl ResourceOutputs {
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Id => Some(&self.id),
            Attribute::Name => Some(&self.name),
            Attribute::Arn => self.arn.as_deref(),
        }
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
