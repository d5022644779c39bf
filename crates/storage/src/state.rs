// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use ebx_core::{AttrRef, Operation, ResourceRecord};
use std::collections::BTreeMap;

/// What the stack looked like after the last recorded operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializedState {
    pub resources: BTreeMap<String, ResourceRecord>,
    pub outputs: BTreeMap<String, String>,
}

impl MaterializedState {
    pub fn get(&self, name: &str) -> Option<&ResourceRecord> {
        self.resources.get(name)
    }

    /// Value of a recorded resource attribute
    pub fn attribute(&self, reference: &AttrRef) -> Option<String> {
        self.resources
            .get(&reference.resource)
            .and_then(|record| record.outputs.get(reference.attribute))
            .map(str::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.outputs.is_empty()
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::ResourceUpsert { name, record } => {
                self.resources.insert(name.clone(), record.clone());
            }
            Operation::ResourceDelete { name } => {
                self.resources.remove(name);
            }
            Operation::OutputSet { name, value } => {
                self.outputs.insert(name.clone(), value.clone());
            }
            Operation::OutputRemove { name } => {
                self.outputs.remove(name);
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
