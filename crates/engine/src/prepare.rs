// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fill in values that depend on the local filesystem

use crate::error::EngineError;
use ebx_adapters::CodeArchive;
use ebx_core::{ResourceGraph, ResourceSpec};
use std::path::Path;

/// Record each function's code digest so source changes show up as updates
///
/// A missing code directory is left for the provider to reject at apply
/// time, so `preview` still works on a fresh checkout.
pub fn prepare(graph: &mut ResourceGraph, project_root: &Path) -> Result<(), EngineError> {
    for resource in graph.resources_mut() {
        let ResourceSpec::Function(spec) = &mut resource.spec else {
            continue;
        };
        let dir = project_root.join(&spec.code);
        if !dir.exists() {
            tracing::warn!(resource = %resource.name, dir = %dir.display(), "code directory missing");
            spec.code_hash = None;
            continue;
        }
        let archive = CodeArchive::from_dir(&dir).map_err(|source| EngineError::Archive {
            resource: resource.name.clone(),
            source,
        })?;
        tracing::debug!(
            resource = %resource.name,
            files = archive.files().len(),
            digest = archive.digest(),
            "hashed function code"
        );
        spec.code_hash = Some(archive.digest().to_string());
    }
    Ok(())
}

#[cfg(test)]
#[path = "prepare_tests.rs"]
mod tests;
