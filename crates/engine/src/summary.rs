// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome of an apply or destroy

use crate::error::EngineError;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct Failure {
    pub name: String,
    pub error: EngineError,
}

#[derive(Debug, Default)]
pub struct ApplySummary {
    pub read: Vec<String>,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub replaced: Vec<String>,
    pub deleted: Vec<String>,
    pub forgotten: Vec<String>,
    pub same: Vec<String>,
    pub failed: Vec<Failure>,
    /// Not attempted because a dependency failed
    pub skipped: Vec<String>,
    /// Stack outputs after the run
    pub outputs: BTreeMap<String, String>,
    /// Stopped before every step ran
    pub cancelled: bool,
}

impl ApplySummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty() && !self.cancelled
    }

    pub fn failure(&self, name: &str) -> Option<&EngineError> {
        self.failed.iter().find(|f| f.name == name).map(|f| &f.error)
    }

    /// Resources whose provider state changed
    pub fn changed(&self) -> usize {
        self.created.len() + self.updated.len() + self.replaced.len() + self.deleted.len()
    }
}
