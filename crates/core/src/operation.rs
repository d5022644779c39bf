// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the state log

use crate::input::ResourceOutputs;
use crate::resource::{ResourceKind, ResourceSpec};
use crate::traced::TracedEffect;
use serde::{Deserialize, Serialize};

/// What is known about a resource after it was last applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    /// Spec as declared, references intact; compared on the next plan
    pub declared: ResourceSpec,
    /// Spec as sent to the provider
    pub resolved: ResourceSpec,
    pub outputs: ResourceOutputs,
    /// Logical names this resource depended on when applied
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Operations that can be persisted to the state log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// A resource was read, created, updated or replaced
    ResourceUpsert {
        name: String,
        record: ResourceRecord,
    },

    /// A resource was deleted (or, if external, forgotten)
    ResourceDelete { name: String },

    /// A stack output was resolved
    OutputSet { name: String, value: String },

    /// A stack output is no longer declared
    OutputRemove { name: String },
}

impl TracedEffect for Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::ResourceUpsert { .. } => "resource_upsert",
            Operation::ResourceDelete { .. } => "resource_delete",
            Operation::OutputSet { .. } => "output_set",
            Operation::OutputRemove { .. } => "output_remove",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Operation::ResourceUpsert { name, record } => vec![
                ("resource", name.clone()),
                ("kind", record.kind.type_token().to_string()),
                ("physical_name", record.outputs.name.clone()),
            ],
            Operation::ResourceDelete { name } => vec![("resource", name.clone())],
            Operation::OutputSet { name, value } => {
                vec![("output", name.clone()), ("value", value.clone())]
            }
            Operation::OutputRemove { name } => vec![("output", name.clone())],
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
