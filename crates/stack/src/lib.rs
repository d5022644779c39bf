// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Project configuration and the partner event pipeline declaration

mod pipeline;
mod project;

pub use pipeline::{
    all_events_pattern, declare_pipeline, names, specific_events_pattern, DeclareError,
    PipelineSettings, BASIC_EXECUTION_POLICY_ARN, BUS_NAME_KEY, DETAIL_FILTER_KEY,
    DETAIL_FILTER_VALUE, FUNCTION_HANDLER, FUNCTION_NAME_OUTPUT, FUNCTION_RUNTIME,
    FUNCTION_SERVICE, FUNCTION_TIMEOUT_SECS, LOG_RETENTION_DAYS, PARTNER_SOURCE,
    SPECIFIC_DETAIL_TYPE,
};
pub use project::{
    parse_project, ConfigError, ParseError, Project, StackConfig, DEFAULT_REGION,
    DEFAULT_SOURCE_DIR, KNOWN_BUSES_KEY, PROJECT_FILE, REGION_KEY,
};

use ebx_core::ResourceGraph;
use thiserror::Error;

/// Errors from turning a project's stack into a resource graph
#[derive(Debug, Error)]
pub enum StackError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Declare(#[from] DeclareError),
}

/// Validate a stack's configuration, then declare its resources
///
/// Configuration problems fail here, before any resource is declared.
pub fn declare(project: &Project, stack: &str) -> Result<ResourceGraph, StackError> {
    let config = project.stack(stack)?;
    let settings = PipelineSettings::from_config(config, &project.source_dir)?;
    Ok(declare_pipeline(&settings)?)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
