// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IAM policy documents
//!
//! Trust policies are built as typed values and serialized, never assembled
//! from strings. [`PolicyDocument::parse`] is the inverse used on the
//! provider side to reject malformed documents.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current policy language version
pub const POLICY_VERSION: &str = "2012-10-17";
/// Legacy version still accepted by the provider
pub const LEGACY_POLICY_VERSION: &str = "2008-10-17";
/// Action a trust policy grants
pub const ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// Errors from parsing or validating a policy document
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported policy version: {0}")]
    Version(String),
    #[error("policy has no statements")]
    Empty,
    #[error("invalid principal: {0}")]
    Principal(String),
}

/// A single string or a list of strings, as accepted throughout IAM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        match self {
            OneOrMany::One(s) => std::slice::from_ref(s).iter(),
            OneOrMany::Many(v) => v.iter(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Principals keyed by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalMap {
    #[serde(rename = "Service", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<OneOrMany>,
    #[serde(rename = "AWS", default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<OneOrMany>,
    #[serde(rename = "Federated", default, skip_serializing_if = "Option::is_none")]
    pub federated: Option<OneOrMany>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Principal {
    /// Only `"*"` is meaningful here
    Any(String),
    Scoped(PrincipalMap),
}

impl Principal {
    pub fn service(service: &str) -> Self {
        Principal::Scoped(PrincipalMap {
            service: Some(service.into()),
            ..PrincipalMap::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: OneOrMany,
    pub principal: Principal,
    pub effect: Effect,
    #[serde(default)]
    pub sid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Trust policy letting a single service assume the role
    pub fn assume_role(service: &str) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                action: ASSUME_ROLE_ACTION.into(),
                principal: Principal::service(service),
                effect: Effect::Allow,
                sid: String::new(),
            }],
        }
    }

    pub fn to_json(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a policy document
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        let doc: PolicyDocument = serde_json::from_str(text)?;
        if doc.version != POLICY_VERSION && doc.version != LEGACY_POLICY_VERSION {
            return Err(PolicyError::Version(doc.version));
        }
        if doc.statement.is_empty() {
            return Err(PolicyError::Empty);
        }
        for statement in &doc.statement {
            match &statement.principal {
                Principal::Any(p) if p != "*" => {
                    return Err(PolicyError::Principal(p.clone()));
                }
                Principal::Scoped(map)
                    if map.service.is_none() && map.aws.is_none() && map.federated.is_none() =>
                {
                    return Err(PolicyError::Principal("empty principal".to_string()));
                }
                _ => {}
            }
        }
        Ok(doc)
    }

    /// True if `sts:AssumeRole` is granted to `service` and nobody else
    pub fn trusts_only(&self, service: &str) -> bool {
        let grants: Vec<&Statement> = self
            .statement
            .iter()
            .filter(|s| s.effect == Effect::Allow && s.action.contains(ASSUME_ROLE_ACTION))
            .collect();

        !grants.is_empty()
            && grants.iter().all(|s| match &s.principal {
                Principal::Any(_) => false,
                Principal::Scoped(map) => {
                    map.aws.is_none()
                        && map.federated.is_none()
                        && map
                            .service
                            .as_ref()
                            .is_some_and(|svc| svc.len() == 1 && svc.contains(service))
                }
            })
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
