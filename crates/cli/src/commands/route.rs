// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ebx route`: evaluate the declared rule patterns against an event

use super::Context;
use crate::output;
use anyhow::Context as _;
use ebx_core::{EventPattern, Input, PatternError, ResourceGraph, ResourceSpec};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct RouteArgs {
    /// JSON file holding one event envelope
    pub event: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct RouteTarget {
    pub name: String,
    pub destination: String,
}

#[derive(Debug, Serialize)]
pub struct RouteMatch {
    pub rule: String,
    pub bus: String,
    pub targets: Vec<RouteTarget>,
}

#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub matched: Vec<RouteMatch>,
}

impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched.is_empty() {
            return write!(f, "No rules match");
        }
        let mut lines = Vec::new();
        for m in &self.matched {
            lines.push(format!("{} (bus {})", m.rule, m.bus));
            for t in &m.targets {
                lines.push(format!("  -> {} ({})", t.destination, t.name));
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}

/// Name of the resource an input points at, or its literal value
fn endpoint(input: &Input) -> String {
    match input.reference() {
        Some(r) => r.resource.clone(),
        None => input.to_string(),
    }
}

/// Configured name of the bus a rule lives on
fn bus_of(graph: &ResourceGraph, input: &Input) -> String {
    let bus = input.reference().and_then(|r| graph.get(&r.resource));
    match bus.map(|b| &b.spec) {
        Some(ResourceSpec::EventBus(spec)) => endpoint(&spec.name),
        _ => endpoint(input),
    }
}

fn targets_of(graph: &ResourceGraph, rule: &str) -> Vec<RouteTarget> {
    graph
        .resources()
        .iter()
        .filter_map(|r| match &r.spec {
            ResourceSpec::EventTarget(spec) if endpoint(&spec.rule) == rule => Some(RouteTarget {
                name: r.name.clone(),
                destination: endpoint(&spec.arn),
            }),
            _ => None,
        })
        .collect()
}

/// Rules whose pattern accepts `event`, in declaration order, with their
/// targets
pub fn route(graph: &ResourceGraph, event: &Value) -> Result<RouteReport, PatternError> {
    let mut matched = Vec::new();
    for resource in graph.resources() {
        let ResourceSpec::EventRule(spec) = &resource.spec else {
            continue;
        };
        let pattern = EventPattern::parse(&spec.event_pattern)?;
        if !pattern.matches(event) {
            continue;
        }
        matched.push(RouteMatch {
            rule: resource.name.clone(),
            bus: bus_of(graph, &spec.event_bus_name),
            targets: targets_of(graph, &resource.name),
        });
    }
    Ok(RouteReport { matched })
}

pub fn handle(ctx: &Context, args: RouteArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.event)
        .with_context(|| format!("cannot read event file {}", args.event.display()))?;
    let event: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.event.display()))?;

    let graph = ctx.declare()?;
    let report = route(&graph, &event).context("declared rule has an invalid pattern")?;
    output::print(&report, ctx.format)
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
