// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ebx-engine: plans and applies the declared graph

mod error;
mod executor;
mod plan;
mod prepare;
mod summary;

pub use error::EngineError;
pub use executor::Executor;
pub use plan::{Plan, Step, StepOp};
pub use prepare::prepare;
pub use summary::{ApplySummary, Failure};
