// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O

pub mod archive;
pub mod provider;
pub mod traced;

pub use archive::{ArchiveError, CodeArchive};
pub use provider::{
    validate, ProviderAdapter, ProviderError, ResourceRequest, SimulatedProvider,
    DEFAULT_ACCOUNT_ID,
};
pub use traced::TracedProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use provider::{FakeFailure, FakeProvider, ProviderCall};
