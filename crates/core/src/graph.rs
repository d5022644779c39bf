// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declared resource graph
//!
//! Resources are declared one at a time and may only reference resources
//! declared before them, so the graph is acyclic by construction. Edges are
//! derived from [`Input::Ref`] values and explicit `depends_on` lists.

use crate::input::{AttrRef, Attribute, Input};
use crate::resource::{Resource, ResourceKind, ResourceSpec};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Errors raised while declaring resources
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("resource already declared: {0}")]
    Duplicate(String),
    #[error("{resource} references undeclared resource {reference}")]
    UnknownReference { resource: String, reference: String },
    #[error("output {output} must reference a declared resource")]
    InvalidOutput { output: String },
}

/// Handle to a declared resource, used to wire it into later declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    name: String,
    kind: ResourceKind,
}

impl ResourceHandle {
    pub fn logical_name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn attr(&self, attribute: Attribute) -> Input {
        Input::Ref(AttrRef::new(self.name.clone(), attribute))
    }

    pub fn id(&self) -> Input {
        self.attr(Attribute::Id)
    }

    pub fn name(&self) -> Input {
        self.attr(Attribute::Name)
    }

    pub fn arn(&self) -> Input {
        self.attr(Attribute::Arn)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    index: HashMap<String, usize>,
    outputs: BTreeMap<String, AttrRef>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource whose dependencies are implied by its references
    pub fn declare(
        &mut self,
        name: &str,
        spec: ResourceSpec,
    ) -> Result<ResourceHandle, GraphError> {
        self.declare_with_deps(name, spec, &[])
    }

    /// Declare a resource that must also wait for `depends_on`
    ///
    /// Use this for ordering that no reference expresses, such as a function
    /// that needs its role's policies attached first. The extra edges count
    /// everywhere reference edges do.
    pub fn declare_with_deps(
        &mut self,
        name: &str,
        spec: ResourceSpec,
        depends_on: &[&ResourceHandle],
    ) -> Result<ResourceHandle, GraphError> {
        if self.index.contains_key(name) {
            return Err(GraphError::Duplicate(name.to_string()));
        }

        let referenced = spec.references().into_iter().map(|r| r.resource.as_str());
        let explicit = depends_on.iter().map(|h| h.logical_name());
        if let Some(unknown) = referenced
            .chain(explicit)
            .find(|dep| !self.index.contains_key(*dep))
        {
            return Err(GraphError::UnknownReference {
                resource: name.to_string(),
                reference: unknown.to_string(),
            });
        }

        let kind = spec.kind();
        tracing::debug!(resource = name, kind = %kind, "declared");

        self.index.insert(name.to_string(), self.resources.len());
        self.resources.push(Resource {
            name: name.to_string(),
            spec,
            depends_on: depends_on
                .iter()
                .map(|h| h.logical_name().to_string())
                .collect(),
        });

        Ok(ResourceHandle {
            name: name.to_string(),
            kind,
        })
    }

    /// Publish a stack output
    pub fn export(&mut self, name: &str, value: Input) -> Result<(), GraphError> {
        match value {
            Input::Ref(r) if self.index.contains_key(&r.resource) => {
                self.outputs.insert(name.to_string(), r);
                Ok(())
            }
            _ => Err(GraphError::InvalidOutput {
                output: name.to_string(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.index.get(name).map(|&i| &self.resources[i])
    }

    /// Resources in declaration order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> impl Iterator<Item = &mut Resource> {
        self.resources.iter_mut()
    }

    pub fn outputs(&self) -> &BTreeMap<String, AttrRef> {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Direct dependencies of a resource
    pub fn dependencies(&self, name: &str) -> BTreeSet<&str> {
        let Some(resource) = self.get(name) else {
            return BTreeSet::new();
        };
        resource
            .spec
            .references()
            .into_iter()
            .map(|r| r.resource.as_str())
            .chain(resource.depends_on.iter().map(String::as_str))
            .collect()
    }

    /// Resources grouped into waves: every member of a wave depends only on
    /// members of earlier waves. Within a wave, declaration order is kept.
    pub fn waves(&self) -> Vec<Vec<&str>> {
        let mut remaining: BTreeMap<usize, BTreeSet<&str>> = self
            .resources
            .iter()
            .enumerate()
            .map(|(i, r)| (i, self.dependencies(&r.name)))
            .collect();
        let mut done: BTreeSet<&str> = BTreeSet::new();
        let mut waves = Vec::new();

        while !remaining.is_empty() {
            let ready: Vec<usize> = remaining
                .iter()
                .filter(|(_, deps)| deps.iter().all(|d| done.contains(d)))
                .map(|(&i, _)| i)
                .collect();
            // References only point backwards, so some resource is always ready
            if ready.is_empty() {
                break;
            }
            let wave: Vec<&str> = ready
                .iter()
                .map(|&i| self.resources[i].name.as_str())
                .collect();
            for i in ready {
                remaining.remove(&i);
            }
            done.extend(wave.iter().copied());
            waves.push(wave);
        }
        waves
    }

    /// Topological order: waves flattened
    pub fn order(&self) -> Vec<&str> {
        self.waves().into_iter().flatten().collect()
    }

    /// Serializable view of the graph
    pub fn document(&self) -> GraphDocument<'_> {
        GraphDocument {
            resources: self
                .resources
                .iter()
                .map(|r| ResourceEntry {
                    name: &r.name,
                    type_token: r.kind().type_token(),
                    spec: &r.spec,
                    dependencies: self.dependencies(&r.name),
                })
                .collect(),
            outputs: self
                .outputs
                .iter()
                .map(|(k, v)| (k.as_str(), v.to_string()))
                .collect(),
            waves: self.waves(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GraphDocument<'a> {
    pub resources: Vec<ResourceEntry<'a>>,
    pub outputs: BTreeMap<&'a str, String>,
    pub waves: Vec<Vec<&'a str>>,
}

#[derive(Debug, Serialize)]
pub struct ResourceEntry<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub type_token: &'static str,
    pub spec: &'a ResourceSpec,
    pub dependencies: BTreeSet<&'a str>,
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
