// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider-assigned identifiers

use ebx_core::ResourceKind;

/// Account used when none is configured
pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

/// ARN for a resource of `kind` with physical name `name`
///
/// Attachments and targets have no ARN of their own.
pub fn arn_for(kind: ResourceKind, region: &str, account: &str, name: &str) -> Option<String> {
    let arn = match kind {
        ResourceKind::EventBus => format!("arn:aws:events:{region}:{account}:event-bus/{name}"),
        ResourceKind::LogGroup => format!("arn:aws:logs:{region}:{account}:log-group:{name}"),
        ResourceKind::Role => format!("arn:aws:iam::{account}:role/{name}"),
        ResourceKind::Function => format!("arn:aws:lambda:{region}:{account}:function:{name}"),
        ResourceKind::EventRule => format!("arn:aws:events:{region}:{account}:rule/{name}"),
        ResourceKind::RolePolicyAttachment | ResourceKind::EventTarget => return None,
    };
    Some(arn)
}

/// Provider id for a created resource
///
/// Attachments are identified by `role/policy`, targets by `rule/target`,
/// everything else by its physical name.
pub(crate) fn id_for(spec: &ebx_core::ResourceSpec, physical: &str) -> String {
    use ebx_core::ResourceSpec;
    match spec {
        ResourceSpec::RolePolicyAttachment(s) => {
            format!("{}/{}", s.role.as_value().unwrap_or_default(), s.policy_arn)
        }
        ResourceSpec::EventTarget(s) => {
            format!("{}/{}", s.rule.as_value().unwrap_or_default(), physical)
        }
        _ => physical.to_string(),
    }
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
