// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The partner event pipeline
//!
//! Events from the partner bus are captured twice: every event lands in an
//! archive log group, and one event type is routed both to its own log group
//! and to a processing function.

use crate::project::{ConfigError, StackConfig};
use ebx_core::{
    EventBusSpec, EventPattern, EventRuleSpec, EventTargetSpec, FunctionSpec, GraphError,
    LogGroupSpec, PatternError, PolicyDocument, PolicyError, ResourceGraph, ResourceHandle,
    ResourceSpec, RolePolicyAttachmentSpec, RoleSpec,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration key naming the partner event bus
pub const BUS_NAME_KEY: &str = "adobeEventBusName";
pub const PARTNER_SOURCE: &str = "aws.partner/developer.adobe.com.test";
pub const SPECIFIC_DETAIL_TYPE: &str = "Imaging API Events:photoshop-job-status";
// Placeholder business filter for the narrow rule
pub const DETAIL_FILTER_KEY: &str = "key";
pub const DETAIL_FILTER_VALUE: &str = "value";

pub const FUNCTION_SERVICE: &str = "lambda.amazonaws.com";
pub const BASIC_EXECUTION_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";
pub const FUNCTION_RUNTIME: &str = "python3.11";
pub const FUNCTION_HANDLER: &str = "AdobeProcessOrderEvents.handler";
pub const FUNCTION_TIMEOUT_SECS: u32 = 15;
pub const LOG_RETENTION_DAYS: u32 = 1;

/// Stack output carrying the function's physical name
pub const FUNCTION_NAME_OUTPUT: &str = "AdobeProcessSpecificEventsLambdaOutput";

/// Logical resource names
pub mod names {
    pub const EVENT_BUS: &str = "partner-event-bus";
    pub const ALL_EVENTS_LOG_GROUP: &str = "Adobe-all-events";
    pub const SPECIFIC_EVENTS_LOG_GROUP: &str = "Adobe-specific-events";
    pub const ROLE: &str = "adobe-cdk-lambda-role";
    pub const ROLE_POLICY_ATTACHMENT: &str = "lambdaBasicExecutionRole";
    pub const FUNCTION: &str = "AdobeProcessOrderEventsLambda";
    pub const ALL_EVENTS_RULE: &str = "AdobeAllEventsRule";
    pub const ALL_EVENTS_TARGET: &str = "AdobeAllEventsTarget";
    pub const SPECIFIC_EVENTS_RULE: &str = "AdobeSpecificEventsRule";
    pub const FUNCTION_TARGET: &str = "AdobeOrderEventsLambdaTarget";
    pub const SPECIFIC_EVENTS_LOG_TARGET: &str = "AdobeOrderEventsLogTarget";
}

/// Errors from declaring the pipeline's resources
#[derive(Debug, Error)]
pub enum DeclareError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("trust policy error: {0}")]
    Policy(#[from] PolicyError),
    #[error("event pattern error: {0}")]
    Pattern(#[from] PatternError),
}

/// Validated inputs of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Name of the existing partner event bus
    pub bus_name: String,
    /// Function source directory, relative to the project root
    pub source_dir: PathBuf,
}

impl PipelineSettings {
    pub fn from_config(config: &StackConfig, source_dir: &Path) -> Result<Self, ConfigError> {
        let bus_name = config.require(BUS_NAME_KEY)?.to_string();
        Ok(Self {
            bus_name,
            source_dir: source_dir.to_path_buf(),
        })
    }
}

/// Pattern of the archive rule: everything from the partner source
pub fn all_events_pattern() -> EventPattern {
    EventPattern::for_source(PARTNER_SOURCE)
}

/// Pattern of the processing rule
pub fn specific_events_pattern() -> EventPattern {
    EventPattern::for_source(PARTNER_SOURCE)
        .with_detail_type(SPECIFIC_DETAIL_TYPE)
        .with_detail_value(DETAIL_FILTER_KEY, DETAIL_FILTER_VALUE)
}

fn log_group(graph: &mut ResourceGraph, name: &str) -> Result<ResourceHandle, GraphError> {
    graph.declare(
        name,
        ResourceSpec::LogGroup(LogGroupSpec {
            retention_in_days: LOG_RETENTION_DAYS,
            tags: BTreeMap::from([("Name".to_string(), name.to_string())]),
        }),
    )
}

fn target(
    graph: &mut ResourceGraph,
    name: &str,
    bus: &ResourceHandle,
    rule: &ResourceHandle,
    destination: &ResourceHandle,
) -> Result<ResourceHandle, GraphError> {
    graph.declare(
        name,
        ResourceSpec::EventTarget(EventTargetSpec {
            rule: rule.name(),
            arn: destination.arn(),
            event_bus_name: Some(bus.name()),
        }),
    )
}

/// Declare every resource of the pipeline
pub fn declare_pipeline(settings: &PipelineSettings) -> Result<ResourceGraph, DeclareError> {
    let mut graph = ResourceGraph::new();

    let bus = graph.declare(
        names::EVENT_BUS,
        ResourceSpec::EventBus(EventBusSpec {
            name: settings.bus_name.as_str().into(),
        }),
    )?;

    let all_events_logs = log_group(&mut graph, names::ALL_EVENTS_LOG_GROUP)?;
    let specific_events_logs = log_group(&mut graph, names::SPECIFIC_EVENTS_LOG_GROUP)?;

    let role = graph.declare(
        names::ROLE,
        ResourceSpec::Role(RoleSpec {
            assume_role_policy: PolicyDocument::assume_role(FUNCTION_SERVICE).to_json()?,
        }),
    )?;
    let execution_policy = graph.declare(
        names::ROLE_POLICY_ATTACHMENT,
        ResourceSpec::RolePolicyAttachment(RolePolicyAttachmentSpec {
            role: role.name(),
            policy_arn: BASIC_EXECUTION_POLICY_ARN.to_string(),
        }),
    )?;

    // The function must not run before its role can write logs
    let function = graph.declare_with_deps(
        names::FUNCTION,
        ResourceSpec::Function(FunctionSpec {
            runtime: FUNCTION_RUNTIME.to_string(),
            code: settings.source_dir.clone(),
            code_hash: None,
            handler: FUNCTION_HANDLER.to_string(),
            role: role.arn(),
            timeout: FUNCTION_TIMEOUT_SECS,
        }),
        &[&execution_policy],
    )?;

    let all_events_rule = graph.declare(
        names::ALL_EVENTS_RULE,
        ResourceSpec::EventRule(EventRuleSpec {
            event_bus_name: bus.name(),
            event_pattern: all_events_pattern().to_json()?,
        }),
    )?;
    target(
        &mut graph,
        names::ALL_EVENTS_TARGET,
        &bus,
        &all_events_rule,
        &all_events_logs,
    )?;

    let specific_events_rule = graph.declare(
        names::SPECIFIC_EVENTS_RULE,
        ResourceSpec::EventRule(EventRuleSpec {
            event_bus_name: bus.name(),
            event_pattern: specific_events_pattern().to_json()?,
        }),
    )?;
    target(
        &mut graph,
        names::FUNCTION_TARGET,
        &bus,
        &specific_events_rule,
        &function,
    )?;
    target(
        &mut graph,
        names::SPECIFIC_EVENTS_LOG_TARGET,
        &bus,
        &specific_events_rule,
        &specific_events_logs,
    )?;

    graph.export(FUNCTION_NAME_OUTPUT, function.name())?;

    tracing::debug!(resources = graph.len(), "pipeline declared");
    Ok(graph)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
