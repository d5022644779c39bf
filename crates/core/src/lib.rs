// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ebx-core: resource model for the partner event pipeline
//!
//! This crate provides:
//! - Typed resource specs whose cross-resource fields are inputs
//! - The declared resource graph and its dependency order
//! - IAM trust policy and event pattern documents
//! - Operations recorded in the state log

pub mod graph;
pub mod id;
pub mod input;
pub mod operation;
pub mod pattern;
pub mod policy;
pub mod resource;
pub mod traced;

pub use graph::{GraphDocument, GraphError, ResourceGraph, ResourceHandle};
pub use id::{auto_name, IdGen, SequentialIdGen, UuidIdGen};
pub use input::{AttrRef, Attribute, Input, ResourceOutputs};
pub use operation::{Operation, ResourceRecord};
pub use pattern::{EventPattern, FieldFilter, PatternError};
pub use policy::{PolicyDocument, PolicyError};
pub use resource::{
    Change, EventBusSpec, EventRuleSpec, EventTargetSpec, FunctionSpec, LogGroupSpec, Resource,
    ResourceKind, ResourceSpec, RolePolicyAttachmentSpec, RoleSpec,
};
pub use traced::TracedEffect;
