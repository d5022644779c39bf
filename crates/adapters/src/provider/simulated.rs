// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Offline provider
//!
//! Validates every request the way the cloud API would, packages function
//! code, and synthesizes names and ARNs. Nothing leaves the machine; the
//! recorded state is the only trace of what was "deployed".

use super::naming::{arn_for, id_for, DEFAULT_ACCOUNT_ID};
use super::validate::validate;
use super::{ProviderAdapter, ProviderError, ResourceRequest};
use crate::archive::{ArchiveError, CodeArchive};
use async_trait::async_trait;
use ebx_core::{
    auto_name, FunctionSpec, IdGen, ResourceKind, ResourceOutputs, ResourceSpec, UuidIdGen,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Clone)]
pub struct SimulatedProvider<G: IdGen = UuidIdGen> {
    region: String,
    account_id: String,
    /// Function code paths are relative to this directory
    root: PathBuf,
    /// Buses that exist; any bus reads when unset
    known_buses: Option<BTreeSet<String>>,
    id_gen: G,
}

impl SimulatedProvider<UuidIdGen> {
    pub fn new(region: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self::with_id_gen(region, root, UuidIdGen)
    }
}

impl<G: IdGen> SimulatedProvider<G> {
    pub fn with_id_gen(region: impl Into<String>, root: impl Into<PathBuf>, id_gen: G) -> Self {
        Self {
            region: region.into(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            root: root.into(),
            known_buses: None,
            id_gen,
        }
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Only these buses exist; reading any other is `NotFound`
    pub fn with_known_buses<I, S>(mut self, buses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_buses = Some(buses.into_iter().map(Into::into).collect());
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn outputs(&self, request: &ResourceRequest, physical: String) -> ResourceOutputs {
        let kind = request.kind();
        ResourceOutputs {
            id: id_for(&request.spec, &physical),
            arn: arn_for(kind, &self.region, &self.account_id, &physical),
            name: physical,
        }
    }

    /// Package the function's code and confirm the handler resolves
    async fn package(&self, spec: &FunctionSpec) -> Result<(), ProviderError> {
        let dir = self.root.join(&spec.code);
        let runtime = spec.runtime.clone();
        let handler = spec.handler.clone();
        let join_path = dir.clone();
        let archive = tokio::task::spawn_blocking(move || {
            let archive = CodeArchive::from_dir(&dir)?;
            archive.resolve_handler(&runtime, &handler)?;
            Ok::<_, ArchiveError>(archive)
        })
        .await
        .map_err(|e| ArchiveError::Io {
            path: join_path,
            source: std::io::Error::other(e),
        })??;

        tracing::debug!(
            files = archive.files().len(),
            digest = archive.digest(),
            "packaged function code"
        );
        Ok(())
    }
}

#[async_trait]
impl<G: IdGen + 'static> ProviderAdapter for SimulatedProvider<G> {
    async fn read(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError> {
        let ResourceSpec::EventBus(spec) = &request.spec else {
            return Err(ProviderError::Unsupported {
                operation: "read",
                kind: request.kind(),
            });
        };
        validate(request)?;
        let name = spec.name.as_value().unwrap_or_default().to_string();
        if let Some(known) = &self.known_buses {
            if !known.contains(&name) {
                return Err(ProviderError::NotFound {
                    kind: request.kind(),
                    name,
                });
            }
        }
        Ok(self.outputs(request, name))
    }

    async fn create(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError> {
        if request.kind().is_external() {
            return Err(ProviderError::Unsupported {
                operation: "create",
                kind: request.kind(),
            });
        }
        validate(request)?;
        if let ResourceSpec::Function(spec) = &request.spec {
            self.package(spec).await?;
        }
        let physical = auto_name(&request.name, &self.id_gen);
        Ok(self.outputs(request, physical))
    }

    async fn update(
        &self,
        request: &ResourceRequest,
        current: &ResourceOutputs,
    ) -> Result<ResourceOutputs, ProviderError> {
        if request.kind().is_external() {
            return Err(ProviderError::Unsupported {
                operation: "update",
                kind: request.kind(),
            });
        }
        validate(request)?;
        if let ResourceSpec::Function(spec) = &request.spec {
            self.package(spec).await?;
        }
        Ok(self.outputs(request, current.name.clone()))
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        current: &ResourceOutputs,
    ) -> Result<(), ProviderError> {
        if kind.is_external() {
            return Err(ProviderError::Unsupported {
                operation: "delete",
                kind,
            });
        }
        tracing::debug!(%kind, id = %current.id, "deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod tests;
