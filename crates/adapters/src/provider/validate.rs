// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request validation shared by every provider
//!
//! These checks mirror what the cloud API rejects, so a bad declaration
//! fails before any resource is touched.

use super::{ProviderError, ResourceRequest};
use ebx_core::{EventPattern, PolicyDocument, ResourceSpec};

/// Retention periods the log service accepts, in days
pub const VALID_RETENTION_DAYS: &[u32] = &[
    1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1096, 1827, 2192, 2557, 2922,
    3288, 3653,
];

pub const MAX_FUNCTION_TIMEOUT_SECS: u32 = 900;

pub const SUPPORTED_RUNTIMES: &[&str] = &[
    "python3.9",
    "python3.10",
    "python3.11",
    "python3.12",
    "python3.13",
    "nodejs18.x",
    "nodejs20.x",
    "nodejs22.x",
];

const MAX_BUS_NAME_LEN: usize = 256;

/// Validate a resolved request
pub fn validate(request: &ResourceRequest) -> Result<(), ProviderError> {
    if let Some(unresolved) = request.spec.references().into_iter().next() {
        return Err(ProviderError::Unresolved(unresolved.clone()));
    }

    match &request.spec {
        ResourceSpec::EventBus(s) => bus_name(s.name.as_value().unwrap_or_default()),
        ResourceSpec::LogGroup(s) => retention(s.retention_in_days),
        ResourceSpec::Role(s) => {
            PolicyDocument::parse(&s.assume_role_policy)?;
            Ok(())
        }
        ResourceSpec::RolePolicyAttachment(s) => {
            if !s.policy_arn.starts_with("arn:aws:iam::") {
                return Err(ProviderError::validation(
                    "policy_arn",
                    format!("{} is not an IAM policy ARN", s.policy_arn),
                ));
            }
            non_empty("role", s.role.as_value())
        }
        ResourceSpec::Function(s) => {
            runtime(&s.runtime)?;
            timeout(s.timeout)?;
            role_arn(s.role.as_value().unwrap_or_default())?;
            let well_formed = s
                .handler
                .rsplit_once('.')
                .is_some_and(|(m, f)| !m.is_empty() && !f.is_empty());
            if !well_formed {
                return Err(ProviderError::validation(
                    "handler",
                    format!("{} is not of the form module.function", s.handler),
                ));
            }
            Ok(())
        }
        ResourceSpec::EventRule(s) => {
            bus_name(s.event_bus_name.as_value().unwrap_or_default())?;
            EventPattern::parse(&s.event_pattern)?;
            Ok(())
        }
        ResourceSpec::EventTarget(s) => {
            non_empty("rule", s.rule.as_value())?;
            target_arn(s.arn.as_value().unwrap_or_default())?;
            match &s.event_bus_name {
                Some(bus) => bus_name(bus.as_value().unwrap_or_default()),
                None => Ok(()),
            }
        }
    }
}

fn non_empty(field: &'static str, value: Option<&str>) -> Result<(), ProviderError> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ProviderError::validation(field, "must not be empty")),
    }
}

pub fn retention(days: u32) -> Result<(), ProviderError> {
    if VALID_RETENTION_DAYS.contains(&days) {
        Ok(())
    } else {
        Err(ProviderError::validation(
            "retention_in_days",
            format!("{} is not an accepted retention period", days),
        ))
    }
}

pub fn timeout(secs: u32) -> Result<(), ProviderError> {
    if (1..=MAX_FUNCTION_TIMEOUT_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(ProviderError::validation(
            "timeout",
            format!("{} is outside 1..={}", secs, MAX_FUNCTION_TIMEOUT_SECS),
        ))
    }
}

pub fn runtime(runtime: &str) -> Result<(), ProviderError> {
    if SUPPORTED_RUNTIMES.contains(&runtime) {
        Ok(())
    } else {
        Err(ProviderError::validation(
            "runtime",
            format!("{} is not a supported runtime", runtime),
        ))
    }
}

pub fn bus_name(name: &str) -> Result<(), ProviderError> {
    if name.is_empty() || name.len() > MAX_BUS_NAME_LEN {
        return Err(ProviderError::validation(
            "event_bus_name",
            format!("must be 1 to {} characters", MAX_BUS_NAME_LEN),
        ));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/')))
    {
        return Err(ProviderError::validation(
            "event_bus_name",
            format!("{:?} contains invalid character {:?}", name, c),
        ));
    }
    Ok(())
}

pub fn role_arn(arn: &str) -> Result<(), ProviderError> {
    let valid = arn
        .strip_prefix("arn:aws:iam::")
        .and_then(|rest| rest.split_once(":role/"))
        .is_some_and(|(account, name)| {
            !account.is_empty() && account.chars().all(|c| c.is_ascii_digit()) && !name.is_empty()
        });
    if valid {
        Ok(())
    } else {
        Err(ProviderError::validation(
            "role",
            format!("{:?} is not a role ARN", arn),
        ))
    }
}

pub fn target_arn(arn: &str) -> Result<(), ProviderError> {
    if arn.starts_with("arn:aws:logs:") || arn.starts_with("arn:aws:lambda:") {
        Ok(())
    } else {
        Err(ProviderError::validation(
            "arn",
            format!("{:?} is not a log group or function ARN", arn),
        ))
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
