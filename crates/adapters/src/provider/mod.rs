// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloud provider adapters

mod naming;
mod simulated;
pub mod validate;

pub use naming::{arn_for, DEFAULT_ACCOUNT_ID};
pub use simulated::SimulatedProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFailure, FakeProvider, ProviderCall};

use crate::archive::ArchiveError;
use async_trait::async_trait;
use ebx_core::{AttrRef, PatternError, PolicyError, ResourceKind, ResourceOutputs, ResourceSpec};
use thiserror::Error;

/// A resource as handed to the provider, every reference already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Logical name in the graph
    pub name: String,
    pub spec: ResourceSpec,
}

impl ResourceRequest {
    pub fn new(name: impl Into<String>, spec: ResourceSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

/// Errors from provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("malformed policy document: {0}")]
    MalformedPolicy(#[from] PolicyError),
    #[error("malformed event pattern: {0}")]
    MalformedPattern(#[from] PatternError),
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("unresolved reference {0}")]
    Unresolved(AttrRef),
    #[error("{kind} {name} not found")]
    NotFound { kind: ResourceKind, name: String },
    #[error("{kind} {name} already exists")]
    Conflict { kind: ResourceKind, name: String },
    #[error("not authorized to manage {kind} {name}")]
    Unauthorized { kind: ResourceKind, name: String },
    #[error("function code: {0}")]
    Archive(#[from] ArchiveError),
    #[error("{operation} is not supported for {kind}")]
    Unsupported {
        operation: &'static str,
        kind: ResourceKind,
    },
}

impl ProviderError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Adapter for managing cloud resources
#[async_trait]
pub trait ProviderAdapter: Clone + Send + Sync + 'static {
    /// Look up an existing resource that this stack does not own
    async fn read(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError>;

    /// Create a resource
    async fn create(&self, request: &ResourceRequest) -> Result<ResourceOutputs, ProviderError>;

    /// Change a resource in place
    async fn update(
        &self,
        request: &ResourceRequest,
        current: &ResourceOutputs,
    ) -> Result<ResourceOutputs, ProviderError>;

    /// Delete a resource
    async fn delete(
        &self,
        kind: ResourceKind,
        current: &ResourceOutputs,
    ) -> Result<(), ProviderError>;
}
