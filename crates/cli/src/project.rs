// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project root discovery

use crate::error::EbxError;
use ebx_stack::PROJECT_FILE;
use std::path::{Path, PathBuf};

/// Overrides discovery when `--project` is not given
pub const PROJECT_ROOT_ENV: &str = "EBX_PROJECT_ROOT";

/// Find the project root
///
/// An explicit `--project` wins, then `EBX_PROJECT_ROOT`, then the nearest
/// directory at or above the current one holding `ebx.toml`.
pub fn find_project_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Ok(root) = std::env::var(PROJECT_ROOT_ENV) {
        return Ok(PathBuf::from(root));
    }
    let cwd = std::env::current_dir()?;
    search_upwards(&cwd).ok_or_else(|| EbxError::project_not_found(&cwd).into())
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_FILE).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
