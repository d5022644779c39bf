// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plans: what applying the declared graph would do
//!
//! A plan is computed by diffing the declared graph against recorded state.
//! References to resources that will get new outputs resolve to an unknown
//! marker, so a dependent whose immutable field points at a replaced
//! resource is itself planned as a replacement.

use ebx_core::{Change, ResourceGraph, ResourceKind};
use ebx_storage::MaterializedState;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stands in for attributes only known after apply
const UNKNOWN: &str = "(known after apply)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOp {
    /// Look up an external resource
    Read,
    Create,
    Update,
    /// Delete, then create
    Replace,
    Delete,
    /// Drop an external resource from state without touching it
    Forget,
    Same,
}

impl StepOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            StepOp::Read => "<=",
            StepOp::Create => "+",
            StepOp::Update => "~",
            StepOp::Replace => "+-",
            StepOp::Delete => "-",
            StepOp::Forget => "x",
            StepOp::Same => " ",
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, StepOp::Replace | StepOp::Delete)
    }
}

impl fmt::Display for StepOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepOp::Read => "read",
            StepOp::Create => "create",
            StepOp::Update => "update",
            StepOp::Replace => "replace",
            StepOp::Delete => "delete",
            StepOp::Forget => "forget",
            StepOp::Same => "same",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub name: String,
    pub kind: ResourceKind,
    pub op: StepOp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Declared resources in dependency order, then removals in reverse
    /// dependency order
    pub steps: Vec<Step>,
}

impl Plan {
    /// Diff the declared graph against recorded state
    pub fn compute(graph: &ResourceGraph, state: &MaterializedState) -> Self {
        let mut steps = Vec::new();
        let mut ops: BTreeMap<&str, StepOp> = BTreeMap::new();

        for name in graph.order() {
            let Some(resource) = graph.get(name) else {
                continue;
            };
            let record = state.get(name);

            let planned = resource.spec.resolve(&|r| {
                // A read of a changed external resource may answer differently
                match ops.get(r.resource.as_str()) {
                    Some(StepOp::Create | StepOp::Replace | StepOp::Read) => {
                        Some(UNKNOWN.to_string())
                    }
                    _ => state.attribute(r).or_else(|| Some(UNKNOWN.to_string())),
                }
            });
            // Every reference was answered above
            let planned = planned.unwrap_or_else(|_| resource.spec.clone());

            let op = match record {
                None if resource.kind().is_external() => StepOp::Read,
                None => StepOp::Create,
                Some(record) if record.kind != resource.kind() => StepOp::Replace,
                Some(record) => {
                    let change = worst(
                        resource.spec.change_from(&record.declared),
                        planned.change_from(&record.resolved),
                    );
                    match (change, resource.kind().is_external()) {
                        (Change::Same, _) => StepOp::Same,
                        (_, true) => StepOp::Read,
                        (Change::Update, false) => StepOp::Update,
                        (Change::Replace, false) => StepOp::Replace,
                    }
                }
            };

            ops.insert(name, op);
            steps.push(Step {
                name: name.to_string(),
                kind: resource.kind(),
                op,
            });
        }

        let removed: BTreeSet<&str> = state
            .resources
            .keys()
            .map(String::as_str)
            .filter(|name| !graph.contains(name))
            .collect();
        steps.extend(removal_steps(state, &removed));

        Plan { steps }
    }

    /// Remove everything recorded in state
    pub fn destroy(state: &MaterializedState) -> Self {
        let all: BTreeSet<&str> = state.resources.keys().map(String::as_str).collect();
        Plan {
            steps: removal_steps(state, &all),
        }
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn count(&self, op: StepOp) -> usize {
        self.steps.iter().filter(|s| s.op == op).count()
    }

    /// True if applying would delete or replace anything
    pub fn is_destructive(&self) -> bool {
        self.steps.iter().any(|s| s.op.is_destructive())
    }

    pub fn has_changes(&self) -> bool {
        self.steps.iter().any(|s| s.op != StepOp::Same)
    }

    /// Deletions that clear the way for replacements, dependents first
    pub fn replacement_deletions(&self, state: &MaterializedState) -> Vec<Step> {
        let replaced: BTreeSet<&str> = self
            .steps
            .iter()
            .filter(|s| s.op == StepOp::Replace)
            .map(|s| s.name.as_str())
            .collect();
        removal_steps(state, &replaced)
    }

    /// Removal steps, in the order they must run
    pub fn removals(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|s| matches!(s.op, StepOp::Delete | StepOp::Forget))
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(
                f,
                "{:>2} {:<8} {:<34} {}",
                step.op.symbol(),
                step.op.to_string(),
                step.name,
                step.kind
            )?;
        }
        let summary: Vec<String> = [
            StepOp::Read,
            StepOp::Create,
            StepOp::Update,
            StepOp::Replace,
            StepOp::Delete,
            StepOp::Forget,
            StepOp::Same,
        ]
        .iter()
        .filter_map(|op| match (self.count(*op), op) {
            (0, _) => None,
            (n, StepOp::Same) => Some(format!("{} unchanged", n)),
            (n, op) => Some(format!("{} to {}", n, op)),
        })
        .collect();
        if summary.is_empty() {
            write!(f, "no resources")
        } else {
            write!(f, "{}", summary.join(", "))
        }
    }
}

fn worst(a: Change, b: Change) -> Change {
    match (a, b) {
        (Change::Replace, _) | (_, Change::Replace) => Change::Replace,
        (Change::Update, _) | (_, Change::Update) => Change::Update,
        _ => Change::Same,
    }
}

/// Order `names` so each resource is removed before anything it depends on
fn removal_steps(state: &MaterializedState, names: &BTreeSet<&str>) -> Vec<Step> {
    let mut remaining: BTreeSet<&str> = names.clone();
    let mut steps = Vec::new();

    while !remaining.is_empty() {
        // Removable once no other pending resource depends on it
        let ready: Vec<&str> = remaining
            .iter()
            .copied()
            .filter(|candidate| {
                !remaining.iter().any(|other| {
                    state.get(other).is_some_and(|record| {
                        record.dependencies.iter().any(|d| d == candidate)
                    })
                })
            })
            .collect();
        // Recorded dependencies came from an acyclic graph; drain the rest if not
        let ready = if ready.is_empty() {
            remaining.iter().copied().collect()
        } else {
            ready
        };

        for name in ready {
            remaining.remove(name);
            if let Some(record) = state.get(name) {
                let op = if record.kind.is_external() {
                    StepOp::Forget
                } else {
                    StepOp::Delete
                };
                steps.push(Step {
                    name: name.to_string(),
                    kind: record.kind,
                    op,
                });
            }
        }
    }
    steps
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
