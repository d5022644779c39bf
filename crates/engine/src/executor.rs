// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan executor
//!
//! Replaced resources are deleted first, dependents before what they depend
//! on. Declared resources are then applied wave by wave; every step in a
//! wave runs concurrently. Each completed step is recorded before the next
//! wave starts, so an interrupted run leaves state that matches the provider.

use crate::error::EngineError;
use crate::plan::{Plan, StepOp};
use crate::summary::{ApplySummary, Failure};
use ebx_adapters::{ProviderAdapter, ProviderError, ResourceRequest};
use ebx_core::{
    Change, Operation, ResourceGraph, ResourceKind, ResourceOutputs, ResourceRecord, ResourceSpec,
};
use ebx_storage::StateStore;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::Instrument;

/// What a step ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Read,
    Created,
    Updated,
    Replaced,
}

#[derive(Debug)]
struct StepError {
    error: ProviderError,
    /// A replacement deleted the old resource before failing
    previous_deleted: bool,
}

type StepResult = Result<(Applied, ResourceOutputs), StepError>;

/// Executes plans against a provider
pub struct Executor<P> {
    provider: P,
    cancel: Arc<AtomicBool>,
}

impl<P: ProviderAdapter> Executor<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop starting new work once `flag` is set
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Apply a plan computed for `graph`
    pub async fn apply(
        &self,
        graph: &ResourceGraph,
        plan: &Plan,
        store: &mut StateStore,
    ) -> Result<ApplySummary, EngineError> {
        let mut summary = ApplySummary::default();
        // Outputs of every resource that currently exists, by logical name
        let mut outputs: HashMap<String, ResourceOutputs> = store
            .state()
            .resources
            .iter()
            .map(|(name, record)| (name.clone(), record.outputs.clone()))
            .collect();
        // Failed or skipped; their dependents are skipped
        let mut blocked = self
            .clear_replaced(plan, store, &mut outputs, &mut summary)
            .await?;

        for (index, wave) in graph.waves().into_iter().enumerate() {
            if self.cancelled() {
                tracing::warn!(wave = index, "cancelled before wave");
                summary.cancelled = true;
                break;
            }

            let mut tasks: JoinSet<(String, StepResult)> = JoinSet::new();
            let mut pending: BTreeMap<String, (ResourceSpec, ResourceSpec)> = BTreeMap::new();

            for name in wave {
                let Some(resource) = graph.get(name) else {
                    continue;
                };
                let Some(step) = plan.step(name) else {
                    summary.failed.push(Failure {
                        name: name.to_string(),
                        error: EngineError::Undeclared {
                            resource: name.to_string(),
                        },
                    });
                    blocked.insert(name.to_string());
                    continue;
                };

                if step.op == StepOp::Same {
                    summary.same.push(name.to_string());
                    continue;
                }
                if blocked.contains(name) {
                    continue;
                }
                if let Some(dep) = graph
                    .dependencies(name)
                    .into_iter()
                    .find(|d| blocked.contains(*d))
                {
                    tracing::info!(resource = name, dependency = dep, "skipped");
                    summary.skipped.push(name.to_string());
                    blocked.insert(name.to_string());
                    continue;
                }

                let resolved = resource.spec.resolve(&|r| {
                    outputs
                        .get(&r.resource)
                        .and_then(|o| o.get(r.attribute))
                        .map(str::to_string)
                });
                let resolved = match resolved {
                    Ok(spec) => spec,
                    Err(reference) => {
                        tracing::error!(resource = name, %reference, "unresolved reference");
                        summary.failed.push(Failure {
                            name: name.to_string(),
                            error: EngineError::Unresolved {
                                resource: name.to_string(),
                                reference,
                            },
                        });
                        blocked.insert(name.to_string());
                        continue;
                    }
                };

                let previous = store.state().get(name).cloned();
                if step.op == StepOp::Update {
                    if let Some(record) = &previous {
                        if record.declared == resource.spec && record.resolved == resolved {
                            summary.same.push(name.to_string());
                            continue;
                        }
                    }
                }

                let request = ResourceRequest::new(name, resolved.clone());
                pending.insert(name.to_string(), (resource.spec.clone(), resolved));
                let provider = self.provider.clone();
                let op = step.op;
                let span = tracing::info_span!("step", resource = name, %op);
                tasks.spawn(
                    async move {
                        let start = Instant::now();
                        let result = run_step(&provider, &request, op, previous.as_ref()).await;
                        let elapsed_ms = start.elapsed().as_millis() as u64;
                        match &result {
                            Ok((applied, created)) => tracing::info!(
                                ?applied,
                                physical_name = %created.name,
                                elapsed_ms,
                                "step complete"
                            ),
                            Err(e) => tracing::error!(
                                error = %e.error,
                                elapsed_ms,
                                "step failed"
                            ),
                        }
                        (request.name, result)
                    }
                    .instrument(span),
                );
            }

            let mut join_error = None;
            while let Some(joined) = tasks.join_next().await {
                let (name, result) = match joined {
                    Ok(done) => done,
                    Err(e) => {
                        join_error = Some(e.to_string());
                        continue;
                    }
                };
                let Some((declared, resolved)) = pending.remove(&name) else {
                    continue;
                };

                match result {
                    Ok((applied, resource_outputs)) => {
                        let record = ResourceRecord {
                            kind: declared.kind(),
                            declared,
                            resolved,
                            outputs: resource_outputs.clone(),
                            dependencies: graph
                                .dependencies(&name)
                                .into_iter()
                                .map(str::to_string)
                                .collect(),
                        };
                        store.record(Operation::ResourceUpsert {
                            name: name.clone(),
                            record,
                        })?;
                        outputs.insert(name.clone(), resource_outputs);
                        match applied {
                            Applied::Read => summary.read.push(name),
                            Applied::Created => summary.created.push(name),
                            Applied::Updated => summary.updated.push(name),
                            Applied::Replaced => summary.replaced.push(name),
                        }
                    }
                    Err(StepError {
                        error,
                        previous_deleted,
                    }) => {
                        if previous_deleted {
                            store.record(Operation::ResourceDelete { name: name.clone() })?;
                            outputs.remove(&name);
                        }
                        blocked.insert(name.clone());
                        summary.failed.push(Failure {
                            error: EngineError::Provider {
                                resource: name.clone(),
                                source: error,
                            },
                            name,
                        });
                    }
                }
            }

            // Tasks that panicked or were aborted never reported back
            for name in std::mem::take(&mut pending).into_keys() {
                blocked.insert(name.clone());
                summary.failed.push(Failure {
                    error: EngineError::Task {
                        resource: name.clone(),
                        message: join_error.clone().unwrap_or_default(),
                    },
                    name,
                });
            }
        }

        if !summary.cancelled {
            self.remove(plan, store, &mut summary).await?;
        }

        for (output, reference) in graph.outputs() {
            let Some(value) = outputs
                .get(&reference.resource)
                .and_then(|o| o.get(reference.attribute))
            else {
                continue;
            };
            if store.state().outputs.get(output).map(String::as_str) != Some(value) {
                store.record(Operation::OutputSet {
                    name: output.clone(),
                    value: value.to_string(),
                })?;
            }
        }
        let stale: Vec<String> = store
            .state()
            .outputs
            .keys()
            .filter(|name| !graph.outputs().contains_key(*name))
            .cloned()
            .collect();
        for name in stale {
            store.record(Operation::OutputRemove { name })?;
        }

        summary.outputs = store.state().outputs.clone();
        Ok(summary)
    }

    /// Remove everything a destroy plan names, then every stack output
    pub async fn destroy(
        &self,
        plan: &Plan,
        store: &mut StateStore,
    ) -> Result<ApplySummary, EngineError> {
        let mut summary = ApplySummary::default();
        self.remove(plan, store, &mut summary).await?;

        if summary.failed.is_empty() && !summary.cancelled {
            let outputs: Vec<String> = store.state().outputs.keys().cloned().collect();
            for name in outputs {
                store.record(Operation::OutputRemove { name })?;
            }
        }
        summary.outputs = store.state().outputs.clone();
        Ok(summary)
    }

    /// Delete every resource the plan replaces, dependents first
    ///
    /// Returns the replaced resources still in place; they are not
    /// recreated, and neither is anything that depends on them.
    async fn clear_replaced(
        &self,
        plan: &Plan,
        store: &mut StateStore,
        outputs: &mut HashMap<String, ResourceOutputs>,
        summary: &mut ApplySummary,
    ) -> Result<BTreeSet<String>, EngineError> {
        let deletions = plan.replacement_deletions(store.state());
        let replaced: BTreeSet<String> = deletions.iter().map(|s| s.name.clone()).collect();
        let mut kept: BTreeSet<String> = BTreeSet::new();

        for step in deletions {
            if self.cancelled() {
                tracing::warn!(resource = %step.name, "cancelled before replacement");
                summary.cancelled = true;
                break;
            }
            let Some(record) = store.state().get(&step.name).cloned() else {
                continue;
            };
            // Replaced dependencies of a resource that stays must stay too
            let hold = |kept: &mut BTreeSet<String>| {
                kept.insert(step.name.clone());
                kept.extend(
                    record
                        .dependencies
                        .iter()
                        .filter(|d| replaced.contains(*d))
                        .cloned(),
                );
            };
            if kept.contains(&step.name) {
                tracing::info!(resource = %step.name, "kept: a dependent was not replaced");
                summary.skipped.push(step.name.clone());
                hold(&mut kept);
                continue;
            }

            let op = StepOp::Replace;
            let span = tracing::info_span!("step", resource = %step.name, %op);
            let result = delete(&self.provider, record.kind, &record.outputs)
                .instrument(span)
                .await;
            match result {
                Ok(()) => {
                    store.record(Operation::ResourceDelete {
                        name: step.name.clone(),
                    })?;
                    outputs.remove(&step.name);
                }
                Err(error) => {
                    hold(&mut kept);
                    summary.failed.push(Failure {
                        name: step.name.clone(),
                        error: EngineError::Provider {
                            resource: step.name.clone(),
                            source: error,
                        },
                    });
                }
            }
        }
        Ok(kept)
    }

    /// Run a plan's removal steps in order
    ///
    /// A resource is kept while anything that depends on it failed to go.
    async fn remove(
        &self,
        plan: &Plan,
        store: &mut StateStore,
        summary: &mut ApplySummary,
    ) -> Result<(), EngineError> {
        // Dependencies of removals that failed or were skipped
        let mut held: BTreeSet<String> = BTreeSet::new();

        for step in plan.removals() {
            if self.cancelled() {
                tracing::warn!(resource = %step.name, "cancelled before removal");
                summary.cancelled = true;
                break;
            }
            let Some(record) = store.state().get(&step.name).cloned() else {
                continue;
            };
            if held.contains(&step.name) {
                tracing::info!(resource = %step.name, "kept: a dependent was not removed");
                summary.skipped.push(step.name.clone());
                held.extend(record.dependencies.iter().cloned());
                continue;
            }

            if step.op == StepOp::Forget || record.kind.is_external() {
                store.record(Operation::ResourceDelete {
                    name: step.name.clone(),
                })?;
                summary.forgotten.push(step.name.clone());
                continue;
            }

            let span = tracing::info_span!("step", resource = %step.name, op = %step.op);
            let result = delete(&self.provider, record.kind, &record.outputs)
                .instrument(span)
                .await;
            match result {
                Ok(()) => {
                    store.record(Operation::ResourceDelete {
                        name: step.name.clone(),
                    })?;
                    summary.deleted.push(step.name.clone());
                }
                Err(error) => {
                    held.extend(record.dependencies.iter().cloned());
                    summary.failed.push(Failure {
                        name: step.name.clone(),
                        error: EngineError::Provider {
                            resource: step.name.clone(),
                            source: error,
                        },
                    });
                }
            }
        }
        Ok(())
    }
}

/// Delete a resource; one that is already gone counts as deleted
async fn delete<P: ProviderAdapter>(
    provider: &P,
    kind: ResourceKind,
    outputs: &ResourceOutputs,
) -> Result<(), ProviderError> {
    match provider.delete(kind, outputs).await {
        Ok(()) => Ok(()),
        Err(ProviderError::NotFound { .. }) => {
            tracing::warn!(id = %outputs.id, "already deleted");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn run_step<P: ProviderAdapter>(
    provider: &P,
    request: &ResourceRequest,
    op: StepOp,
    previous: Option<&ResourceRecord>,
) -> StepResult {
    let failed = |error| StepError {
        error,
        previous_deleted: false,
    };

    match (op, previous) {
        (StepOp::Read, _) => provider
            .read(request)
            .await
            .map(|o| (Applied::Read, o))
            .map_err(failed),
        (StepOp::Update, Some(record))
            if record.kind == request.kind()
                && request.spec.change_from(&record.resolved) != Change::Replace =>
        {
            provider
                .update(request, &record.outputs)
                .await
                .map(|o| (Applied::Updated, o))
                .map_err(failed)
        }
        (StepOp::Update | StepOp::Replace, Some(record)) => {
            delete(provider, record.kind, &record.outputs)
                .await
                .map_err(failed)?;
            provider
                .create(request)
                .await
                .map(|o| (Applied::Replaced, o))
                .map_err(|error| StepError {
                    error,
                    previous_deleted: true,
                })
        }
        _ => {
            // A replaced resource was deleted before the forward waves
            let applied = if op == StepOp::Replace {
                Applied::Replaced
            } else {
                Applied::Created
            };
            provider
                .create(request)
                .await
                .map(|o| (applied, o))
                .map_err(failed)
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
