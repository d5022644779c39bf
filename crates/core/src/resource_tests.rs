// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::input::Attribute;
use yare::parameterized;

fn function() -> FunctionSpec {
    FunctionSpec {
        runtime: "python3.11".to_string(),
        code: PathBuf::from("src"),
        code_hash: None,
        handler: "AdobeProcessOrderEvents.handler".to_string(),
        role: Input::Ref(AttrRef::new("adobe-cdk-lambda-role", Attribute::Arn)),
        timeout: 15,
    }
}

fn target() -> EventTargetSpec {
    EventTargetSpec {
        rule: Input::Ref(AttrRef::new("AdobeSpecificEventsRule", Attribute::Name)),
        arn: Input::Ref(AttrRef::new("AdobeProcessOrderEventsLambda", Attribute::Arn)),
        event_bus_name: Some(Input::Ref(AttrRef::new("acme-bus", Attribute::Name))),
    }
}

#[test]
fn target_references_rule_destination_and_bus() {
    let spec = ResourceSpec::EventTarget(target());
    let refs: Vec<String> = spec.references().iter().map(|r| r.to_string()).collect();
    assert_eq!(
        refs,
        vec![
            "AdobeSpecificEventsRule.name",
            "AdobeProcessOrderEventsLambda.arn",
            "acme-bus.name"
        ]
    );
}

#[test]
fn log_group_has_no_references() {
    let spec = ResourceSpec::LogGroup(LogGroupSpec {
        retention_in_days: 1,
        tags: BTreeMap::new(),
    });
    assert!(spec.references().is_empty());
}

#[test]
fn resolve_replaces_every_reference() {
    let spec = ResourceSpec::Function(function());
    let resolved = spec
        .resolve(&|r: &AttrRef| Some(format!("arn:aws:iam::123456789012:role/{}", r.resource)))
        .unwrap();
    assert!(resolved.references().is_empty());
    let ResourceSpec::Function(f) = resolved else {
        panic!("kind changed");
    };
    assert_eq!(
        f.role.as_value(),
        Some("arn:aws:iam::123456789012:role/adobe-cdk-lambda-role")
    );
    assert_eq!(f.timeout, 15);
}

#[test]
fn resolve_reports_missing_reference() {
    let spec = ResourceSpec::EventTarget(target());
    let missing = spec
        .resolve(&|r: &AttrRef| {
            (r.resource != "AdobeProcessOrderEventsLambda").then(|| "x".to_string())
        })
        .unwrap_err();
    assert_eq!(missing.resource, "AdobeProcessOrderEventsLambda");
}

#[parameterized(
    timeout = { |f: &mut FunctionSpec| f.timeout = 30, Change::Update },
    handler = { |f: &mut FunctionSpec| f.handler = "other.handler".to_string(), Change::Update },
    code = { |f: &mut FunctionSpec| f.code_hash = Some("abc".to_string()), Change::Update },
    unchanged = { |_: &mut FunctionSpec| {}, Change::Same },
)]
fn function_changes(edit: fn(&mut FunctionSpec), expected: Change) {
    let old = ResourceSpec::Function(function());
    let mut new = function();
    edit(&mut new);
    assert_eq!(ResourceSpec::Function(new).change_from(&old), expected);
}

#[parameterized(
    destination = { |t: &mut EventTargetSpec| t.arn = Input::from("arn:aws:logs:x"), Change::Update },
    rule = { |t: &mut EventTargetSpec| t.rule = Input::from("OtherRule"), Change::Replace },
    bus = { |t: &mut EventTargetSpec| t.event_bus_name = None, Change::Replace },
)]
fn target_changes(edit: fn(&mut EventTargetSpec), expected: Change) {
    let old = ResourceSpec::EventTarget(target());
    let mut new = target();
    edit(&mut new);
    assert_eq!(ResourceSpec::EventTarget(new).change_from(&old), expected);
}

#[test]
fn kind_change_is_replace() {
    let old = ResourceSpec::Function(function());
    let new = ResourceSpec::Role(RoleSpec {
        assume_role_policy: "{}".to_string(),
    });
    assert_eq!(new.change_from(&old), Change::Replace);
}

#[test]
fn spec_serializes_with_kind_tag() {
    let spec = ResourceSpec::LogGroup(LogGroupSpec {
        retention_in_days: 1,
        tags: BTreeMap::from([("Name".to_string(), "Adobe-all-events".to_string())]),
    });
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json["kind"], "log_group");
    assert_eq!(json["retention_in_days"], 1);
    let back: ResourceSpec = serde_json::from_value(json).unwrap();
    assert_eq!(back, spec);
}

#[test]
fn only_event_bus_is_external() {
    assert!(ResourceKind::EventBus.is_external());
    assert!(!ResourceKind::LogGroup.is_external());
    assert!(!ResourceKind::Function.is_external());
}
