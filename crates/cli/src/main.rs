// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ebx - partner event pipeline as typed infrastructure code

mod commands;
mod completions;
mod error;
mod logging;
mod output;
mod project;

use clap::{Parser, Subcommand};
use commands::{destroy, graph, output as outputs, preview, route, up, Context};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::EbxError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "ebx",
    version,
    about = "ebx - Route partner events to log groups and a processing function"
)]
pub(crate) struct Cli {
    /// Project root directory (holds ebx.toml)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Stack to operate on
    #[arg(long, global = true, default_value = "dev")]
    stack: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what an apply would change
    Preview,
    /// Apply the stack
    Up(up::UpArgs),
    /// Delete every resource the stack created
    Destroy(destroy::DestroyArgs),
    /// Print recorded stack outputs
    Output(outputs::OutputArgs),
    /// Print the declared resource graph as JSON
    Graph,
    /// Show which rules and targets an event would reach
    Route(route::RouteArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Completions need no project
    if let Commands::Completions(args) = cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let root = project::find_project_root(cli.project.as_deref())?;
    let ctx = Context::load(root, cli.stack, cli.format)?;

    match cli.command {
        Commands::Preview => preview::handle(&ctx),
        Commands::Up(args) => up::handle(&ctx, args).await,
        Commands::Destroy(args) => destroy::handle(&ctx, args).await,
        Commands::Output(args) => outputs::handle(&ctx, args),
        Commands::Graph => graph::handle(&ctx),
        Commands::Route(args) => route::handle(&ctx, args),
        Commands::Completions(_) => Ok(()),
    }
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<EbxError>() {
        Some(e) => eprint!("{}", e),
        None => eprintln!("error: {:#}", error),
    }
}
