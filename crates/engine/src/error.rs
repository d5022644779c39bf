// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use ebx_adapters::{ArchiveError, ProviderError};
use ebx_core::AttrRef;
use ebx_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("state error: {0}")]
    Store(#[from] StoreError),
    #[error("{resource}: cannot resolve {reference}")]
    Unresolved { resource: String, reference: AttrRef },
    #[error("{resource}: {source}")]
    Provider {
        resource: String,
        source: ProviderError,
    },
    #[error("{resource}: not in the declared graph")]
    Undeclared { resource: String },
    #[error("packaging {resource}: {source}")]
    Archive {
        resource: String,
        source: ArchiveError,
    },
    #[error("{resource}: provider task failed: {message}")]
    Task { resource: String, message: String },
}

impl EngineError {
    /// The provider's error, if the provider rejected the step
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            EngineError::Provider { source, .. } => Some(source),
            _ => None,
        }
    }
}
