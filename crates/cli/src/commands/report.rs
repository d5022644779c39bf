// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Printable outcome of an apply or destroy

use ebx_engine::ApplySummary;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct FailureInfo {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub stack: String,
    pub read: Vec<String>,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub replaced: Vec<String>,
    pub deleted: Vec<String>,
    pub forgotten: Vec<String>,
    pub unchanged: usize,
    pub failed: Vec<FailureInfo>,
    pub skipped: Vec<String>,
    pub outputs: BTreeMap<String, String>,
    pub cancelled: bool,
}

impl RunReport {
    pub fn new(stack: &str, summary: &ApplySummary) -> Self {
        Self {
            stack: stack.to_string(),
            read: summary.read.clone(),
            created: summary.created.clone(),
            updated: summary.updated.clone(),
            replaced: summary.replaced.clone(),
            deleted: summary.deleted.clone(),
            forgotten: summary.forgotten.clone(),
            unchanged: summary.same.len(),
            failed: summary
                .failed
                .iter()
                .map(|f| FailureInfo {
                    name: f.name.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
            skipped: summary.skipped.clone(),
            outputs: summary.outputs.clone(),
            cancelled: summary.cancelled,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: [(&str, &[String]); 7] = [
            ("read", &self.read),
            ("created", &self.created),
            ("updated", &self.updated),
            ("replaced", &self.replaced),
            ("deleted", &self.deleted),
            ("forgotten", &self.forgotten),
            ("skipped", &self.skipped),
        ];
        for (label, names) in groups {
            for name in names {
                writeln!(f, "  {:<10} {}", label, name)?;
            }
        }
        for failure in &self.failed {
            writeln!(f, "  {:<10} {}", "failed", failure.error)?;
        }

        if !self.outputs.is_empty() {
            writeln!(f, "\nOutputs:")?;
            for (name, value) in &self.outputs {
                writeln!(f, "  {}: {}", name, value)?;
            }
        }

        write!(
            f,
            "\nstack {}: {} created, {} updated, {} replaced, {} deleted, {} unchanged, {} failed",
            self.stack,
            self.created.len(),
            self.updated.len(),
            self.replaced.len(),
            self.deleted.len(),
            self.unchanged,
            self.failed.len()
        )?;
        if self.cancelled {
            write!(f, " (interrupted)")?;
        }
        Ok(())
    }
}
