// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error says what went wrong, why it might have happened, and how to
//! fix it.

use std::fmt;
use std::path::Path;

use ebx_engine::ApplySummary;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct EbxError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl EbxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for EbxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for EbxError {}

/// Common error builders for typical failure scenarios.
impl EbxError {
    /// No project file between `start` and the filesystem root
    pub fn project_not_found(start: &Path) -> Self {
        EbxError::new("no ebx.toml found")
            .with_context(format!("searched {} and its parents", start.display()))
            .with_suggestion("Run ebx from inside the project directory")
            .with_suggestion("Point at the project explicitly: ebx --project <dir>")
    }

    pub fn unknown_stack(stack: &str, known: &[&str]) -> Self {
        let err = EbxError::new(format!("stack '{}' is not configured", stack));
        let err = if known.is_empty() {
            err.with_context("ebx.toml declares no stacks")
        } else {
            err.with_context(format!("configured stacks: {}", known.join(", ")))
        };
        err.with_suggestion(format!("Add a [stack.{}.config] table to ebx.toml", stack))
            .with_suggestion("Select another stack: ebx --stack <name>")
    }

    /// A required configuration value is absent or empty
    pub fn missing_config(stack: &str, key: &str) -> Self {
        EbxError::new(format!(
            "missing required configuration value '{}' for stack '{}'",
            key, stack
        ))
        .with_context("No resources were declared")
        .with_suggestion(format!(
            "Set it under [stack.{}.config] in ebx.toml: {} = \"<value>\"",
            stack, key
        ))
    }

    pub fn state_locked(path: &Path, holder: Option<&str>) -> Self {
        let err = EbxError::new(format!("stack state is locked: {}", path.display()));
        let err = match holder {
            Some(pid) => err.with_context(format!("held by process {}", pid)),
            None => err,
        };
        err.with_context("Another ebx up or destroy is running on this stack")
            .with_suggestion("Wait for the other run to finish")
    }

    /// The plan deletes or replaces resources and was not confirmed
    pub fn destructive_plan(stack: &str, deletes: usize, replaces: usize) -> Self {
        EbxError::new("plan deletes or replaces resources")
            .with_context(format!("{} to delete, {} to replace", deletes, replaces))
            .with_suggestion(format!("Review the changes: ebx --stack {} preview", stack))
            .with_suggestion(format!("Apply anyway: ebx --stack {} up --yes", stack))
    }

    pub fn destroy_unconfirmed(stack: &str) -> Self {
        EbxError::new(format!("destroy of stack '{}' needs confirmation", stack))
            .with_context("Every resource the stack created would be deleted")
            .with_suggestion(format!("Confirm with: ebx --stack {} destroy --yes", stack))
    }

    /// Some steps failed, were skipped, or never started
    pub fn run_incomplete(summary: &ApplySummary, command: &str) -> Self {
        let mut err = EbxError::new(format!(
            "{} did not complete: {} failed, {} skipped",
            command,
            summary.failed.len(),
            summary.skipped.len()
        ));
        for failure in &summary.failed {
            err = err.with_context(failure.error.to_string());
        }
        if summary.cancelled {
            err = err.with_context("interrupted before every step started");
        }
        err.with_context("Completed steps were recorded")
            .with_suggestion(format!("Fix the cause and rerun: ebx {}", command))
    }

    pub fn unknown_output(name: &str, known: &[&str]) -> Self {
        let err = EbxError::new(format!("no stack output named '{}'", name));
        let err = if known.is_empty() {
            err.with_context("The stack has no recorded outputs")
                .with_suggestion("Apply the stack first: ebx up")
        } else {
            err.with_context(format!("recorded outputs: {}", known.join(", ")))
        };
        err.with_suggestion("List every output: ebx output")
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
