// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL writer for durable append operations

use super::entry::WalEntry;
use super::reader::WalReader;
use ebx_core::Operation;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// WAL writer; every append is fsync'd before returning
pub struct WalWriter {
    path: PathBuf,
    file: File,
    next_sequence: u64,
}

impl WalWriter {
    /// Open or create a WAL file, continuing after its last valid entry
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let next_sequence = WalReader::open_or_empty(path)
            .last_sequence()
            .map_err(std::io::Error::other)?
            .map(|s| s + 1)
            .unwrap_or(0);

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            next_sequence,
        })
    }

    /// Append an operation, returning its sequence number
    pub fn append(&mut self, operation: Operation) -> std::io::Result<u64> {
        let sequence = self.next_sequence;
        let entry = WalEntry::new(sequence, operation);
        let mut line = entry.to_line().map_err(std::io::Error::other)?;
        line.push('\n');

        // One write, so a crash never leaves an entry without its newline
        self.file.write_all(line.as_bytes())?;
        self.file.sync_all()?;

        self.next_sequence += 1;
        Ok(sequence)
    }

    /// Sequence number the next append will get
    pub fn sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
