// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Physical name generation
//!
//! Created resources get a physical name of the form `<logical>-<suffix>`,
//! so a replacement can be created before its predecessor is gone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Length of the random suffix appended to logical names
pub const SUFFIX_LEN: usize = 7;

/// Generates name suffixes
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// UUID-based suffix generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(SUFFIX_LEN);
        id
    }
}

/// Sequential suffix generator for testing
#[derive(Clone)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{:0width$x}", n, width = SUFFIX_LEN)
    }
}

/// Build a physical name from a logical name and a fresh suffix
pub fn auto_name(logical: &str, id_gen: &impl IdGen) -> String {
    format!("{}-{}", logical, id_gen.next())
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
