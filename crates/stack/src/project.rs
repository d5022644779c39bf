// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project file parsing
//!
//! ```toml
//! [project]
//! name = "aws-adobe-eventbridge-lambda"
//! source_dir = "src"
//!
//! [stack.dev.config]
//! adobeEventBusName = "acme-bus"
//! "aws:region" = "us-east-1"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project file name, looked up at the project root
pub const PROJECT_FILE: &str = "ebx.toml";
pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const REGION_KEY: &str = "aws:region";
pub const DEFAULT_REGION: &str = "us-east-1";
/// Comma-separated buses that exist; any bus is assumed to exist when unset
pub const KNOWN_BUSES_KEY: &str = "ebx:knownBuses";

/// Errors that can occur during project file parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from looking up stack configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("stack not found: {0}")]
    UnknownStack(String),
    #[error("missing required configuration value {key} in stack {stack}")]
    Missing { stack: String, key: String },
    #[error("configuration value {key} in stack {stack} is empty")]
    Empty { stack: String, key: String },
}

/// Configuration values of one stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackConfig {
    pub stack: String,
    pub project: String,
    pub values: BTreeMap<String, String>,
}

impl StackConfig {
    /// Look up a key, bare or namespaced with the project name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .or_else(|| self.values.get(&format!("{}:{}", self.project, key)))
            .map(String::as_str)
    }

    /// Look up a key that must be present and non-empty
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        match self.get(key) {
            None => Err(ConfigError::Missing {
                stack: self.stack.clone(),
                key: key.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(ConfigError::Empty {
                stack: self.stack.clone(),
                key: key.to_string(),
            }),
            Some(v) => Ok(v),
        }
    }

    pub fn region(&self) -> &str {
        self.get(REGION_KEY).unwrap_or(DEFAULT_REGION)
    }

    pub fn known_buses(&self) -> Option<Vec<&str>> {
        self.get(KNOWN_BUSES_KEY).map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|bus| !bus.is_empty())
                .collect()
        })
    }
}

/// A parsed project file
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub name: String,
    /// Function source directory, relative to the project root
    pub source_dir: PathBuf,
    pub stacks: BTreeMap<String, StackConfig>,
}

impl Project {
    /// Read and parse the project file under `root`
    pub fn load(root: &Path) -> Result<Self, ParseError> {
        let path = root.join(PROJECT_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;
        parse_project(&content)
    }

    /// Get a stack's configuration by name
    pub fn stack(&self, name: &str) -> Result<&StackConfig, ConfigError> {
        self.stacks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownStack(name.to_string()))
    }
}

/// Parse a project from TOML content
pub fn parse_project(content: &str) -> Result<Project, ParseError> {
    let raw: toml::Value = toml::from_str(content)?;
    let table = raw
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("root must be a table".to_string()))?;

    let section = table
        .get("project")
        .ok_or_else(|| ParseError::MissingField("project".to_string()))?
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("project must be a table".to_string()))?;

    let name = section
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ParseError::MissingField("project.name".to_string()))?
        .to_string();

    let source_dir = section
        .get("source_dir")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_SOURCE_DIR)
        .into();

    let mut project = Project {
        name,
        source_dir,
        stacks: BTreeMap::new(),
    };

    if let Some(stacks) = table.get("stack").and_then(|v| v.as_table()) {
        for (stack_name, value) in stacks {
            let config = parse_stack(&project.name, stack_name, value)?;
            project.stacks.insert(stack_name.clone(), config);
        }
    }

    Ok(project)
}

fn parse_stack(
    project: &str,
    name: &str,
    value: &toml::Value,
) -> Result<StackConfig, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("stack.{} must be a table", name)))?;

    let mut values = BTreeMap::new();
    if let Some(config) = table.get("config") {
        let config = config.as_table().ok_or_else(|| {
            ParseError::InvalidFormat(format!("stack.{}.config must be a table", name))
        })?;
        for (key, value) in config {
            // Config values are strings; scalars are accepted and stringified
            let text = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                _ => {
                    return Err(ParseError::InvalidFormat(format!(
                        "stack.{}.config.{} must be a scalar",
                        name, key
                    )))
                }
            };
            values.insert(key.clone(), text);
        }
    }

    Ok(StackConfig {
        stack: name.to_string(),
        project: project.to_string(),
        values,
    })
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
