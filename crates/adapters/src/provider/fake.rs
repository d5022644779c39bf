// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::naming::{arn_for, id_for, DEFAULT_ACCOUNT_ID};
use super::validate::validate;
use super::{ProviderAdapter, ProviderError, ResourceRequest};
use async_trait::async_trait;
use ebx_core::{auto_name, ResourceKind, ResourceOutputs, ResourceSpec, SequentialIdGen};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

const FAKE_REGION: &str = "us-east-1";

/// Recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Read { name: String },
    Create { name: String, kind: ResourceKind },
    Update { name: String, kind: ResourceKind },
    Delete { id: String, kind: ResourceKind },
}

/// Failure to inject for a logical resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    Unauthorized,
    Conflict,
    NotFound,
}

impl FakeFailure {
    fn error(self, kind: ResourceKind, name: String) -> ProviderError {
        match self {
            FakeFailure::Unauthorized => ProviderError::Unauthorized { kind, name },
            FakeFailure::Conflict => ProviderError::Conflict { kind, name },
            FakeFailure::NotFound => ProviderError::NotFound { kind, name },
        }
    }
}

#[derive(Default)]
struct FakeState {
    buses: HashSet<String>,
    /// Live resources by provider id
    live: BTreeMap<String, (ResourceKind, ResourceOutputs)>,
    failures: HashMap<String, FakeFailure>,
    /// Injected delete failures by provider id
    delete_failures: HashMap<String, FakeFailure>,
    calls: Vec<ProviderCall>,
}

/// Fake provider for testing
///
/// Runs the same validation as the real provider but never touches the
/// filesystem. Buses must be registered before they can be read.
#[derive(Clone)]
pub struct FakeProvider {
    inner: Arc<Mutex<FakeState>>,
    id_gen: SequentialIdGen,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState::default())),
            id_gen: SequentialIdGen::new(),
        }
    }

    /// Register buses that exist outside the stack
    pub fn with_buses(self, buses: &[&str]) -> Self {
        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            state.buses.extend(buses.iter().map(|b| b.to_string()));
        }
        self
    }

    /// Make every create or update of `logical` fail
    pub fn fail_with(&self, logical: &str, failure: FakeFailure) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .insert(logical.to_string(), failure);
    }

    /// Make every delete of the resource with provider id `id` fail
    pub fn fail_delete(&self, id: &str, failure: FakeFailure) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .delete_failures
            .insert(id.to_string(), failure);
    }

    pub fn clear_failures(&self) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.failures.clear();
        state.delete_failures.clear();
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Live resources of a kind
    pub fn live(&self, kind: ResourceKind) -> Vec<ResourceOutputs> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .live
            .values()
            .filter(|(k, _)| *k == kind)
            .map(|(_, outputs)| outputs.clone())
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .live
            .len()
    }

    fn injected(&self, request: &ResourceRequest) -> Result<(), ProviderError> {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match state.failures.get(&request.name) {
            None => Ok(()),
            Some(failure) => Err(failure.error(request.kind(), request.name.clone())),
        }
    }

    fn outputs(request: &ResourceRequest, physical: String) -> ResourceOutputs {
        ResourceOutputs {
            id: id_for(&request.spec, &physical),
            arn: arn_for(request.kind(), FAKE_REGION, DEFAULT_ACCOUNT_ID, &physical),
            name: physical,
        }
    }
}

#[async_trait]
impl ProviderAdapter for FakeProvider {
    async fn read(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ProviderCall::Read {
            name: request.name.clone(),
        });

        let ResourceSpec::EventBus(spec) = &request.spec else {
            return Err(ProviderError::Unsupported {
                operation: "read",
                kind: request.kind(),
            });
        };
        let name = spec.name.as_value().unwrap_or_default().to_string();
        if !state.buses.contains(&name) {
            return Err(ProviderError::NotFound {
                kind: ResourceKind::EventBus,
                name,
            });
        }
        Ok(Self::outputs(request, name))
    }

    async fn create(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .push(ProviderCall::Create {
                name: request.name.clone(),
                kind: request.kind(),
            });

        validate(request)?;
        self.injected(request)?;

        let outputs = Self::outputs(request, auto_name(&request.name, &self.id_gen));
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if state.live.contains_key(&outputs.id) {
            return Err(ProviderError::Conflict {
                kind: request.kind(),
                name: outputs.id,
            });
        }
        state
            .live
            .insert(outputs.id.clone(), (request.kind(), outputs.clone()));
        Ok(outputs)
    }

    async fn update(
        &self,
        request: &ResourceRequest,
        current: &ResourceOutputs,
    ) -> Result<ResourceOutputs, ProviderError> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .push(ProviderCall::Update {
                name: request.name.clone(),
                kind: request.kind(),
            });

        validate(request)?;
        self.injected(request)?;

        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if !state.live.contains_key(&current.id) {
            return Err(ProviderError::NotFound {
                kind: request.kind(),
                name: current.id.clone(),
            });
        }
        let outputs = Self::outputs(request, current.name.clone());
        state.live.remove(&current.id);
        state
            .live
            .insert(outputs.id.clone(), (request.kind(), outputs.clone()));
        Ok(outputs)
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        current: &ResourceOutputs,
    ) -> Result<(), ProviderError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ProviderCall::Delete {
            id: current.id.clone(),
            kind,
        });
        if let Some(failure) = state.delete_failures.get(&current.id) {
            return Err(failure.error(kind, current.id.clone()));
        }
        match state.live.remove(&current.id) {
            Some(_) => Ok(()),
            None => Err(ProviderError::NotFound {
                kind,
                name: current.id.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
