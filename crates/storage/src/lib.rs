// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ebx-storage: durable stack state
//!
//! Every change to a stack is appended to a write-ahead log. The state a
//! plan is computed against is derived by replaying that log.
//!
//! ```text
//! Operation → WalEntry → WalWriter → disk (state.wal)
//!                                        ↓
//!                              WalReader → replay → MaterializedState
//! ```

pub mod entry;
pub mod lock;
pub mod reader;
pub mod state;
pub mod store;
pub mod writer;

pub use entry::WalEntry;
pub use lock::{LockError, StateLock};
pub use reader::{WalEntryIter, WalReadError, WalReader};
pub use state::MaterializedState;
pub use store::{stack_dir, StateStore, StoreError, LOCK_FILE, WAL_FILE};
pub use writer::WalWriter;
