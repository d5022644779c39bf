// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ebx up`

use super::report::RunReport;
use super::{interrupt_flag, Context};
use crate::error::EbxError;
use crate::output::{self, OutputFormat};
use ebx_engine::{Executor, Plan, StepOp};

#[derive(clap::Args, Debug)]
pub struct UpArgs {
    /// Apply even if the plan deletes or replaces resources
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn handle(ctx: &Context, args: UpArgs) -> anyhow::Result<()> {
    let graph = ctx.prepared_graph()?;
    let provider = ctx.provider()?;
    let mut store = ctx.open_store()?;

    let plan = Plan::compute(&graph, store.state());
    if ctx.format == OutputFormat::Text {
        println!("{}\n", plan);
    }
    if plan.is_destructive() && !args.yes {
        return Err(EbxError::destructive_plan(
            &ctx.stack,
            plan.count(StepOp::Delete),
            plan.count(StepOp::Replace),
        )
        .into());
    }

    let executor = Executor::new(provider).with_cancel(interrupt_flag()?);
    let summary = executor.apply(&graph, &plan, &mut store).await?;
    tracing::info!(
        stack = %ctx.stack,
        changed = summary.changed(),
        failed = summary.failed.len(),
        "apply finished"
    );

    output::print(&RunReport::new(&ctx.stack, &summary), ctx.format)?;
    if !summary.is_success() {
        return Err(EbxError::run_incomplete(&summary, "up").into());
    }
    Ok(())
}
