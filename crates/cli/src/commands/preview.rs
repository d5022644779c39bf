// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ebx preview`

use super::Context;
use crate::output;
use ebx_engine::Plan;

pub fn handle(ctx: &Context) -> anyhow::Result<()> {
    let graph = ctx.prepared_graph()?;
    let state = ctx.load_state()?;
    let plan = Plan::compute(&graph, &state);
    output::print(&plan, ctx.format)
}
