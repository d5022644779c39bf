// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ebx destroy`

use super::report::RunReport;
use super::{interrupt_flag, Context};
use crate::error::EbxError;
use crate::output::{self, OutputFormat};
use ebx_engine::{Executor, Plan};

#[derive(clap::Args, Debug)]
pub struct DestroyArgs {
    /// Confirm deleting every resource the stack created
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn handle(ctx: &Context, args: DestroyArgs) -> anyhow::Result<()> {
    if !args.yes {
        return Err(EbxError::destroy_unconfirmed(&ctx.stack).into());
    }

    let provider = ctx.provider()?;
    let mut store = ctx.open_store()?;

    let plan = Plan::destroy(store.state());
    if ctx.format == OutputFormat::Text {
        println!("{}\n", plan);
    }

    let executor = Executor::new(provider).with_cancel(interrupt_flag()?);
    let summary = executor.destroy(&plan, &mut store).await?;
    tracing::info!(
        stack = %ctx.stack,
        deleted = summary.deleted.len(),
        failed = summary.failed.len(),
        "destroy finished"
    );

    output::print(&RunReport::new(&ctx.stack, &summary), ctx.format)?;
    if !summary.is_success() {
        return Err(EbxError::run_incomplete(&summary, "destroy --yes").into());
    }
    Ok(())
}
