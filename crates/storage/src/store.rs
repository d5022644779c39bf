// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locked, replayed stack state

use crate::lock::{LockError, StateLock};
use crate::reader::{WalReadError, WalReader};
use crate::state::MaterializedState;
use crate::writer::WalWriter;
use ebx_core::{Operation, TracedEffect};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const WAL_FILE: &str = "state.wal";
pub const LOCK_FILE: &str = "lock";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("state log {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: WalReadError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// State directory for `stack` under a project root
pub fn stack_dir(project_root: &Path, stack: &str) -> PathBuf {
    project_root.join(".ebx").join("stacks").join(stack)
}

/// Stack state opened for writing
///
/// Holds the directory lock until dropped.
pub struct StateStore {
    dir: PathBuf,
    writer: WalWriter,
    state: MaterializedState,
    _lock: StateLock,
}

impl StateStore {
    /// Lock the state directory and replay its log
    ///
    /// A torn final entry (crash mid-append) is cut off. Any other invalid
    /// entry is an error.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        let lock = StateLock::acquire(&dir.join(LOCK_FILE))?;
        let wal_path = dir.join(WAL_FILE);

        let (state, torn_at) = replay(&wal_path)?;
        if let Some(position) = torn_at {
            let file = std::fs::OpenOptions::new().write(true).open(&wal_path)?;
            file.set_len(position)?;
            file.sync_all()?;
            tracing::warn!(position, "discarded torn entry at end of state log");
        }
        terminate_last_line(&wal_path)?;

        let writer = WalWriter::open(&wal_path)?;
        tracing::debug!(
            resources = state.resources.len(),
            sequence = writer.sequence(),
            "state loaded"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            writer,
            state,
            _lock: lock,
        })
    }

    /// Replay a state directory without locking it or repairing its log
    pub fn load(dir: &Path) -> Result<MaterializedState, StoreError> {
        let (state, torn_at) = replay(&dir.join(WAL_FILE))?;
        if torn_at.is_some() {
            tracing::warn!("state log ends in a torn entry; it is discarded on the next apply");
        }
        Ok(state)
    }

    pub fn state(&self) -> &MaterializedState {
        &self.state
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Durably record an operation, then apply it
    pub fn record(&mut self, op: Operation) -> Result<u64, StoreError> {
        let fields = op
            .fields()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        let sequence = self.writer.append(op.clone())?;
        self.state.apply(&op);
        tracing::debug!(sequence, op = op.name(), "{}", fields);
        Ok(sequence)
    }
}

/// Add the newline a complete final entry is missing, so the next append
/// starts on its own line
fn terminate_last_line(path: &Path) -> std::io::Result<()> {
    let mut file = match std::fs::OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.seek(SeekFrom::End(0))?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        tracing::warn!("state log ended without a newline; terminated final entry");
    }
    Ok(())
}

/// Replay a log, returning the state and, for a torn tail, where it starts
fn replay(path: &Path) -> Result<(MaterializedState, Option<u64>), StoreError> {
    let corrupt = |source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    };

    let mut state = MaterializedState::default();
    let mut iter = WalReader::open_or_empty(path).entries().map_err(corrupt)?;

    while let Some(entry) = iter.next() {
        match entry {
            Ok(entry) => state.apply(&entry.operation),
            Err(e @ WalReadError::Corrupted { .. }) => {
                let position = iter.last_valid_position();
                if iter.at_end() {
                    return Ok((state, Some(position)));
                }
                return Err(corrupt(e));
            }
            Err(e) => return Err(corrupt(e)),
        }
    }
    Ok((state, None))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
