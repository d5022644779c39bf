// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ebx graph`

use super::Context;

/// Always JSON: the graph is for tooling, not for reading
pub fn handle(ctx: &Context) -> anyhow::Result<()> {
    let graph = ctx.declare()?;
    println!("{}", serde_json::to_string_pretty(&graph.document())?);
    Ok(())
}
