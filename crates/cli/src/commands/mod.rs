// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod destroy;
pub mod graph;
pub mod output;
pub mod preview;
mod report;
pub mod route;
pub mod up;

use crate::error::EbxError;
use crate::output::OutputFormat;
use anyhow::Context as _;
use ebx_adapters::{SimulatedProvider, TracedProvider};
use ebx_core::ResourceGraph;
use ebx_engine::prepare;
use ebx_stack::{ConfigError, Project, StackConfig, StackError};
use ebx_storage::{stack_dir, LockError, MaterializedState, StateStore, StoreError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Everything a command needs to know about the selected stack
pub struct Context {
    pub root: PathBuf,
    pub project: Project,
    pub stack: String,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(root: PathBuf, stack: String, format: OutputFormat) -> anyhow::Result<Self> {
        let project = Project::load(&root)
            .with_context(|| format!("cannot load project at {}", root.display()))?;
        Ok(Self {
            root,
            project,
            stack,
            format,
        })
    }

    pub fn config(&self) -> anyhow::Result<&StackConfig> {
        self.project
            .stack(&self.stack)
            .map_err(|e| config_error(&self.project, e).into())
    }

    /// Declare the stack's resources without touching the filesystem
    pub fn declare(&self) -> anyhow::Result<ResourceGraph> {
        ebx_stack::declare(&self.project, &self.stack).map_err(|e| match e {
            StackError::Config(e) => config_error(&self.project, e).into(),
            StackError::Declare(e) => anyhow::Error::new(e).context("cannot declare resources"),
        })
    }

    /// Declare, then hash function code so source edits show up in the plan
    pub fn prepared_graph(&self) -> anyhow::Result<ResourceGraph> {
        let mut graph = self.declare()?;
        prepare(&mut graph, &self.root)?;
        Ok(graph)
    }

    pub fn state_dir(&self) -> PathBuf {
        stack_dir(&self.root, &self.stack)
    }

    /// Recorded state, read without taking the lock
    pub fn load_state(&self) -> anyhow::Result<MaterializedState> {
        StateStore::load(&self.state_dir()).map_err(store_error)
    }

    /// Lock and replay the stack state for an apply or destroy
    pub fn open_store(&self) -> anyhow::Result<StateStore> {
        StateStore::open(&self.state_dir()).map_err(store_error)
    }

    pub fn provider(&self) -> anyhow::Result<TracedProvider<SimulatedProvider>> {
        let config = self.config()?;
        let mut provider = SimulatedProvider::new(config.region(), self.root.clone());
        if let Some(buses) = config.known_buses() {
            provider = provider.with_known_buses(buses);
        }
        Ok(TracedProvider::new(provider))
    }
}

fn config_error(project: &Project, error: ConfigError) -> EbxError {
    match error {
        ConfigError::UnknownStack(stack) => {
            let known: Vec<&str> = project.stacks.keys().map(String::as_str).collect();
            EbxError::unknown_stack(&stack, &known)
        }
        ConfigError::Missing { stack, key } | ConfigError::Empty { stack, key } => {
            EbxError::missing_config(&stack, &key)
        }
    }
}

fn store_error(error: StoreError) -> anyhow::Error {
    match error {
        StoreError::Lock(LockError::Held { path, holder }) => {
            EbxError::state_locked(&path, holder.as_deref()).into()
        }
        other => anyhow::Error::new(other).context("cannot read stack state"),
    }
}

/// Flag set on the first Ctrl-C; in-flight steps finish and are recorded
pub fn interrupt_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        if !handler_flag.swap(true, Ordering::SeqCst) {
            eprintln!("interrupted: finishing in-flight operations");
        }
    })
    .context("cannot install Ctrl-C handler")?;
    Ok(flag)
}
