// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource declarations
//!
//! Each resource kind has a typed spec whose cross-resource fields are
//! [`Input`]s. Policy and pattern fields hold serialized JSON documents, the
//! form the provider receives.

use crate::input::{AttrRef, Input};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    EventBus,
    LogGroup,
    Role,
    RolePolicyAttachment,
    Function,
    EventRule,
    EventTarget,
}

impl ResourceKind {
    /// Provider type token
    pub fn type_token(&self) -> &'static str {
        match self {
            ResourceKind::EventBus => "aws:cloudwatch/eventBus:EventBus",
            ResourceKind::LogGroup => "aws:cloudwatch/logGroup:LogGroup",
            ResourceKind::Role => "aws:iam/role:Role",
            ResourceKind::RolePolicyAttachment => {
                "aws:iam/rolePolicyAttachment:RolePolicyAttachment"
            }
            ResourceKind::Function => "aws:lambda/function:Function",
            ResourceKind::EventRule => "aws:cloudwatch/eventRule:EventRule",
            ResourceKind::EventTarget => "aws:cloudwatch/eventTarget:EventTarget",
        }
    }

    /// Externally owned resources are read, never created or deleted
    pub fn is_external(&self) -> bool {
        matches!(self, ResourceKind::EventBus)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_token())
    }
}

/// Reference to an existing event bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBusSpec {
    pub name: Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogGroupSpec {
    pub retention_in_days: u32,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Serialized trust policy
    pub assume_role_policy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicyAttachmentSpec {
    pub role: Input,
    pub policy_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub runtime: String,
    /// Source directory, relative to the project root
    pub code: PathBuf,
    /// Digest of the packaged source, filled in before planning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_hash: Option<String>,
    pub handler: String,
    pub role: Input,
    /// Seconds
    pub timeout: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRuleSpec {
    pub event_bus_name: Input,
    /// Serialized event pattern
    pub event_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTargetSpec {
    pub rule: Input,
    pub arn: Input,
    /// Required when the rule lives on a non-default bus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_bus_name: Option<Input>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSpec {
    EventBus(EventBusSpec),
    LogGroup(LogGroupSpec),
    Role(RoleSpec),
    RolePolicyAttachment(RolePolicyAttachmentSpec),
    Function(FunctionSpec),
    EventRule(EventRuleSpec),
    EventTarget(EventTargetSpec),
}

/// How a declared spec differs from the previously applied one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Same,
    /// Changeable in place
    Update,
    /// Touches an immutable field
    Replace,
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::EventBus(_) => ResourceKind::EventBus,
            ResourceSpec::LogGroup(_) => ResourceKind::LogGroup,
            ResourceSpec::Role(_) => ResourceKind::Role,
            ResourceSpec::RolePolicyAttachment(_) => ResourceKind::RolePolicyAttachment,
            ResourceSpec::Function(_) => ResourceKind::Function,
            ResourceSpec::EventRule(_) => ResourceKind::EventRule,
            ResourceSpec::EventTarget(_) => ResourceKind::EventTarget,
        }
    }

    fn inputs(&self) -> Vec<&Input> {
        match self {
            ResourceSpec::EventBus(s) => vec![&s.name],
            ResourceSpec::LogGroup(_) | ResourceSpec::Role(_) => Vec::new(),
            ResourceSpec::RolePolicyAttachment(s) => vec![&s.role],
            ResourceSpec::Function(s) => vec![&s.role],
            ResourceSpec::EventRule(s) => vec![&s.event_bus_name],
            ResourceSpec::EventTarget(s) => {
                let mut inputs = vec![&s.rule, &s.arn];
                inputs.extend(s.event_bus_name.as_ref());
                inputs
            }
        }
    }

    /// Every attribute this spec references
    pub fn references(&self) -> Vec<&AttrRef> {
        self.inputs()
            .into_iter()
            .filter_map(Input::reference)
            .collect()
    }

    /// Copy of this spec with every reference replaced by its value
    pub fn resolve<F>(&self, lookup: &F) -> Result<ResourceSpec, AttrRef>
    where
        F: Fn(&AttrRef) -> Option<String>,
    {
        let resolved = match self {
            ResourceSpec::EventBus(s) => ResourceSpec::EventBus(EventBusSpec {
                name: s.name.resolve(lookup)?,
            }),
            ResourceSpec::LogGroup(_) | ResourceSpec::Role(_) => self.clone(),
            ResourceSpec::RolePolicyAttachment(s) => {
                ResourceSpec::RolePolicyAttachment(RolePolicyAttachmentSpec {
                    role: s.role.resolve(lookup)?,
                    policy_arn: s.policy_arn.clone(),
                })
            }
            ResourceSpec::Function(s) => ResourceSpec::Function(FunctionSpec {
                role: s.role.resolve(lookup)?,
                ..s.clone()
            }),
            ResourceSpec::EventRule(s) => ResourceSpec::EventRule(EventRuleSpec {
                event_bus_name: s.event_bus_name.resolve(lookup)?,
                event_pattern: s.event_pattern.clone(),
            }),
            ResourceSpec::EventTarget(s) => ResourceSpec::EventTarget(EventTargetSpec {
                rule: s.rule.resolve(lookup)?,
                arn: s.arn.resolve(lookup)?,
                event_bus_name: s
                    .event_bus_name
                    .as_ref()
                    .map(|bus| bus.resolve(lookup))
                    .transpose()?,
            }),
        };
        Ok(resolved)
    }

    /// Compare against the spec recorded at the last apply
    pub fn change_from(&self, previous: &ResourceSpec) -> Change {
        if self == previous {
            return Change::Same;
        }
        match (self, previous) {
            (ResourceSpec::EventBus(_), ResourceSpec::EventBus(_)) => Change::Replace,
            (ResourceSpec::LogGroup(_), ResourceSpec::LogGroup(_)) => Change::Update,
            (ResourceSpec::Role(_), ResourceSpec::Role(_)) => Change::Update,
            (ResourceSpec::RolePolicyAttachment(_), ResourceSpec::RolePolicyAttachment(_)) => {
                Change::Replace
            }
            (ResourceSpec::Function(_), ResourceSpec::Function(_)) => Change::Update,
            (ResourceSpec::EventRule(new), ResourceSpec::EventRule(old)) => {
                if new.event_bus_name == old.event_bus_name {
                    Change::Update
                } else {
                    Change::Replace
                }
            }
            (ResourceSpec::EventTarget(new), ResourceSpec::EventTarget(old)) => {
                if new.rule == old.rule && new.event_bus_name == old.event_bus_name {
                    Change::Update
                } else {
                    Change::Replace
                }
            }
            _ => Change::Replace,
        }
    }
}

/// A declared resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub name: String,
    pub spec: ResourceSpec,
    /// Explicit dependencies beyond those implied by references
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
