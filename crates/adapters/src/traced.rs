// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::provider::{ProviderAdapter, ProviderError, ResourceRequest};
use async_trait::async_trait;
use ebx_core::{ResourceKind, ResourceOutputs};
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProviderAdapter
#[derive(Clone)]
pub struct TracedProvider<P> {
    inner: P,
}

impl<P> TracedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

/// Requests reaching the provider must be fully resolved
fn check_resolved(request: &ResourceRequest) -> Result<(), ProviderError> {
    match request.spec.references().into_iter().next() {
        Some(unresolved) => {
            tracing::error!(reference = %unresolved, "unresolved reference");
            Err(ProviderError::Unresolved(unresolved.clone()))
        }
        None => Ok(()),
    }
}

fn log_outcome(result: &Result<ResourceOutputs, ProviderError>, start: Instant, done: &str) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(outputs) => tracing::info!(
            id = %outputs.id,
            physical_name = %outputs.name,
            elapsed_ms,
            "{}",
            done
        ),
        Err(e) => tracing::error!(elapsed_ms, error = %e, "{} failed", done),
    }
}

#[async_trait]
impl<P: ProviderAdapter> ProviderAdapter for TracedProvider<P> {
    async fn read(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError> {
        let span = tracing::info_span!("provider.read", name = %request.name, kind = %request.kind());
        async {
            tracing::debug!("reading");
            check_resolved(request)?;
            let start = Instant::now();
            let result = self.inner.read(request).await;
            log_outcome(&result, start, "read");
            result
        }
        .instrument(span)
        .await
    }

    async fn create(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError> {
        let span =
            tracing::info_span!("provider.create", name = %request.name, kind = %request.kind());
        async {
            tracing::info!("starting");
            check_resolved(request)?;
            let start = Instant::now();
            let result = self.inner.create(request).await;
            log_outcome(&result, start, "created");
            result
        }
        .instrument(span)
        .await
    }

    async fn update(
        &self,
        request: &ResourceRequest,
        current: &ResourceOutputs,
    ) -> Result<ResourceOutputs, ProviderError> {
        let span = tracing::info_span!(
            "provider.update",
            name = %request.name,
            kind = %request.kind(),
            id = %current.id
        );
        async {
            tracing::info!("starting");
            check_resolved(request)?;
            let start = Instant::now();
            let result = self.inner.update(request, current).await;
            log_outcome(&result, start, "updated");
            result
        }
        .instrument(span)
        .await
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        current: &ResourceOutputs,
    ) -> Result<(), ProviderError> {
        let span = tracing::info_span!("provider.delete", %kind, id = %current.id);
        async {
            tracing::info!("starting");
            let start = Instant::now();
            let result = self.inner.delete(kind, current).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "deleted"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
