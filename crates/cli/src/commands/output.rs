// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ebx output`

use super::Context;
use crate::error::EbxError;
use crate::output::{self, OutputFormat};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output to print; every output when omitted
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct Outputs(BTreeMap<String, String>);

impl fmt::Display for Outputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No outputs");
        }
        let lines: Vec<String> = self
            .0
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

pub fn handle(ctx: &Context, args: OutputArgs) -> anyhow::Result<()> {
    ctx.config()?;
    let state = ctx.load_state()?;

    let Some(name) = args.name else {
        return output::print(&Outputs(state.outputs), ctx.format);
    };

    let Some(value) = state.outputs.get(&name) else {
        let known: Vec<&str> = state.outputs.keys().map(String::as_str).collect();
        return Err(EbxError::unknown_output(&name, &known).into());
    };
    match ctx.format {
        // Bare value, for use in scripts
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            output::print(&Outputs(BTreeMap::from([(name, value.clone())])), ctx.format)?
        }
    }
    Ok(())
}
