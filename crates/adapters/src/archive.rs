// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Function code archives
//!
//! A source directory is packaged by walking it in sorted order. The archive
//! digest covers every file's relative path and contents, so any source
//! change yields a new digest and therefore a function update.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directories never packaged
const SKIPPED_DIRS: &[&str] = &["__pycache__"];

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("code directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("code path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("code directory is empty: {}", .0.display())]
    Empty(PathBuf),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported runtime: {0}")]
    UnsupportedRuntime(String),
    #[error("handler {handler} does not resolve to a file in the archive (looked for {candidates})")]
    HandlerNotFound { handler: String, candidates: String },
}

/// A packaged source directory
#[derive(Debug, Clone)]
pub struct CodeArchive {
    root: PathBuf,
    files: Vec<PathBuf>,
    digest: String,
}

impl CodeArchive {
    /// Package every file under `root`
    pub fn from_dir(root: &Path) -> Result<Self, ArchiveError> {
        if !root.exists() {
            return Err(ArchiveError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ArchiveError::NotADirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();
        collect_files(root, Path::new(""), &mut files)?;
        if files.is_empty() {
            return Err(ArchiveError::Empty(root.to_path_buf()));
        }
        files.sort();

        let mut hasher = Sha256::new();
        for rel in &files {
            let path = root.join(rel);
            let contents = std::fs::read(&path).map_err(|source| ArchiveError::Io {
                path: path.clone(),
                source,
            })?;
            hasher.update(archive_path(rel).as_bytes());
            hasher.update([0u8]);
            hasher.update((contents.len() as u64).to_le_bytes());
            hasher.update(&contents);
        }
        let digest = hex_encode(&hasher.finalize());

        Ok(Self {
            root: root.to_path_buf(),
            files,
            digest,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths of the packaged files, sorted
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Hex-encoded SHA-256 over the archive contents
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn contains(&self, rel: &Path) -> bool {
        self.files.iter().any(|f| f == rel)
    }

    /// Locate the file the runtime loads for `handler`
    pub fn resolve_handler(&self, runtime: &str, handler: &str) -> Result<PathBuf, ArchiveError> {
        let candidates = handler_candidates(runtime, handler)?;
        candidates
            .iter()
            .find(|c| self.contains(c))
            .cloned()
            .ok_or_else(|| ArchiveError::HandlerNotFound {
                handler: handler.to_string(),
                candidates: candidates
                    .iter()
                    .map(|c| archive_path(c))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Files a runtime may load for a `module.function` handler
pub fn handler_candidates(runtime: &str, handler: &str) -> Result<Vec<PathBuf>, ArchiveError> {
    let not_found = || ArchiveError::HandlerNotFound {
        handler: handler.to_string(),
        candidates: String::new(),
    };
    let (module, function) = handler.rsplit_once('.').ok_or_else(not_found)?;
    if module.is_empty() || function.is_empty() {
        return Err(not_found());
    }

    if runtime.starts_with("python") {
        Ok(vec![PathBuf::from(format!("{}.py", module.replace('.', "/")))])
    } else if runtime.starts_with("nodejs") {
        Ok(["js", "mjs", "cjs"]
            .iter()
            .map(|ext| PathBuf::from(format!("{}.{}", module, ext)))
            .collect())
    } else {
        Err(ArchiveError::UnsupportedRuntime(runtime.to_string()))
    }
}

fn collect_files(root: &Path, rel: &Path, out: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    let dir = root.join(rel);
    let entries = std::fs::read_dir(&dir).map_err(|source| ArchiveError::Io {
        path: dir.clone(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ArchiveError::Io {
            path: dir.clone(),
            source,
        })?;
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        // Hidden entries are never packaged
        if name_str.starts_with('.') {
            continue;
        }
        let child = rel.join(&name);
        let path = entry.path();

        if path.is_dir() {
            if SKIPPED_DIRS.contains(&name_str.as_ref()) {
                continue;
            }
            collect_files(root, &child, out)?;
        } else {
            out.push(child);
        }
    }
    Ok(())
}

/// Archive paths always use forward slashes
fn archive_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
