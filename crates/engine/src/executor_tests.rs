// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ebx_adapters::{FakeFailure, FakeProvider, ProviderCall};
use ebx_core::{EventRuleSpec, EventTargetSpec, LogGroupSpec, RoleSpec};
use ebx_stack::{declare_pipeline, names, PipelineSettings, FUNCTION_NAME_OUTPUT};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn pipeline(bus: &str) -> ResourceGraph {
    declare_pipeline(&PipelineSettings {
        bus_name: bus.to_string(),
        source_dir: PathBuf::from("src"),
    })
    .unwrap()
}

fn setup(buses: &[&str]) -> (TempDir, FakeProvider, StateStore) {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();
    (dir, FakeProvider::new().with_buses(buses), store)
}

async fn apply(
    graph: &ResourceGraph,
    provider: &FakeProvider,
    store: &mut StateStore,
) -> ApplySummary {
    let plan = Plan::compute(graph, store.state());
    Executor::new(provider.clone())
        .apply(graph, &plan, store)
        .await
        .unwrap()
}

fn rule_spec(store: &StateStore, name: &str) -> EventRuleSpec {
    match &store.state().get(name).unwrap().resolved {
        ResourceSpec::EventRule(spec) => spec.clone(),
        other => panic!("expected a rule, got {:?}", other),
    }
}

fn targets_of(store: &StateStore, rule: &str) -> Vec<EventTargetSpec> {
    let physical = &store.state().get(rule).unwrap().outputs.name;
    store
        .state()
        .resources
        .values()
        .filter_map(|record| match &record.resolved {
            ResourceSpec::EventTarget(spec) if spec.rule.as_value() == Some(physical.as_str()) => {
                Some(spec.clone())
            }
            _ => None,
        })
        .collect()
}

fn create_position(calls: &[ProviderCall], name: &str) -> usize {
    calls
        .iter()
        .position(|c| matches!(c, ProviderCall::Create { name: n, .. } if n == name))
        .unwrap()
}

fn set_spec(graph: &mut ResourceGraph, name: &str, spec: ResourceSpec) {
    if let Some(resource) = graph.resources_mut().find(|r| r.name == name) {
        resource.spec = spec;
    }
}

#[tokio::test]
async fn acme_bus_pipeline_applies() {
    let (_dir, provider, mut store) = setup(&["acme-bus"]);
    let graph = pipeline("acme-bus");

    let summary = apply(&graph, &provider, &mut store).await;

    assert!(summary.is_success(), "{:?}", summary);
    assert_eq!(summary.read, vec![names::EVENT_BUS.to_string()]);
    assert_eq!(summary.created.len(), 10);

    // Both rules live on the configured bus
    assert_eq!(
        rule_spec(&store, names::ALL_EVENTS_RULE).event_bus_name.as_value(),
        Some("acme-bus")
    );
    assert_eq!(
        rule_spec(&store, names::SPECIFIC_EVENTS_RULE)
            .event_bus_name
            .as_value(),
        Some("acme-bus")
    );

    // Role exists before the function that assumes it
    let calls = provider.calls();
    assert!(create_position(&calls, names::ROLE) < create_position(&calls, names::FUNCTION));

    assert_eq!(targets_of(&store, names::SPECIFIC_EVENTS_RULE).len(), 2);
    assert_eq!(targets_of(&store, names::ALL_EVENTS_RULE).len(), 1);
    for log_group in [names::ALL_EVENTS_LOG_GROUP, names::SPECIFIC_EVENTS_LOG_GROUP] {
        match &store.state().get(log_group).unwrap().resolved {
            ResourceSpec::LogGroup(spec) => assert_eq!(spec.retention_in_days, 1),
            other => panic!("expected a log group, got {:?}", other),
        }
    }

    let function_name = &store.state().get(names::FUNCTION).unwrap().outputs.name;
    assert!(function_name.starts_with("AdobeProcessOrderEventsLambda-"));
    assert_eq!(summary.outputs.get(FUNCTION_NAME_OUTPUT), Some(function_name));
}

#[tokio::test]
async fn recorded_state_replays_identically() {
    let (dir, provider, mut store) = setup(&["acme-bus"]);
    apply(&pipeline("acme-bus"), &provider, &mut store).await;
    let live = store.state().clone();
    drop(store);

    let reopened = StateStore::open(dir.path()).unwrap();
    assert_eq!(reopened.state(), &live);
}

#[tokio::test]
async fn reapplying_identical_inputs_changes_nothing() {
    let (_dir, provider, mut store) = setup(&["acme-bus"]);
    let graph = pipeline("acme-bus");
    apply(&graph, &provider, &mut store).await;
    let calls_after_first = provider.calls().len();
    let live_after_first = provider.live_count();

    let plan = Plan::compute(&graph, store.state());
    assert!(!plan.has_changes());
    let summary = apply(&graph, &provider, &mut store).await;

    assert_eq!(summary.same.len(), 11);
    assert_eq!(summary.changed(), 0);
    assert_eq!(provider.calls().len(), calls_after_first);
    assert_eq!(provider.live_count(), live_after_first);
}

#[tokio::test]
async fn malformed_trust_policy_stops_at_role() {
    let (_dir, provider, mut store) = setup(&["acme-bus"]);
    let mut graph = pipeline("acme-bus");
    set_spec(
        &mut graph,
        names::ROLE,
        ResourceSpec::Role(RoleSpec {
            assume_role_policy: r#"{"Version": "2012-10-17", "Statement": ["#.to_string(),
        }),
    );

    let summary = apply(&graph, &provider, &mut store).await;

    assert!(matches!(
        summary
            .failure(names::ROLE)
            .and_then(EngineError::provider_error),
        Some(ProviderError::MalformedPolicy(_))
    ));
    for dependent in [
        names::ROLE_POLICY_ATTACHMENT,
        names::FUNCTION,
        names::FUNCTION_TARGET,
    ] {
        assert!(summary.skipped.iter().any(|s| s == dependent), "{}", dependent);
        assert!(store.state().get(dependent).is_none());
    }
    assert!(!provider
        .calls()
        .iter()
        .any(|c| matches!(c, ProviderCall::Create { name, .. } if name == names::FUNCTION)));

    // Independent resources still apply
    assert!(store.state().get(names::ALL_EVENTS_TARGET).is_some());
    assert!(store.state().get(names::SPECIFIC_EVENTS_LOG_TARGET).is_some());
    assert!(summary.outputs.is_empty());
}

#[tokio::test]
async fn missing_bus_skips_rules_and_targets() {
    let (_dir, provider, mut store) = setup(&[]);
    let summary = apply(&pipeline("acme-bus"), &provider, &mut store).await;

    assert!(matches!(
        summary.failure(names::EVENT_BUS).and_then(EngineError::provider_error),
        Some(ProviderError::NotFound { .. })
    ));
    assert_eq!(summary.skipped.len(), 5);
    assert!(store.state().get(names::FUNCTION).is_some());
    assert!(store.state().get(names::ALL_EVENTS_RULE).is_none());
}

#[tokio::test]
async fn rerun_recovers_after_failure() {
    let (_dir, provider, mut store) = setup(&["acme-bus"]);
    let graph = pipeline("acme-bus");
    provider.fail_with(names::FUNCTION, FakeFailure::Unauthorized);

    let first = apply(&graph, &provider, &mut store).await;
    assert!(first.failure(names::FUNCTION).is_some());
    assert_eq!(first.skipped, vec![names::FUNCTION_TARGET.to_string()]);
    assert!(!first.outputs.contains_key(FUNCTION_NAME_OUTPUT));

    provider.clear_failures();
    let second = apply(&graph, &provider, &mut store).await;
    assert!(second.is_success(), "{:?}", second);
    assert_eq!(
        second.created,
        vec![names::FUNCTION.to_string(), names::FUNCTION_TARGET.to_string()]
    );
    assert!(second.outputs.contains_key(FUNCTION_NAME_OUTPUT));
}

#[tokio::test]
async fn code_change_updates_function_in_place() {
    let (_dir, provider, mut store) = setup(&["acme-bus"]);
    let mut graph = pipeline("acme-bus");
    apply(&graph, &provider, &mut store).await;
    let before = store.state().get(names::FUNCTION).unwrap().outputs.clone();

    if let Some(resource) = graph.resources_mut().find(|r| r.name == names::FUNCTION) {
        if let ResourceSpec::Function(spec) = &mut resource.spec {
            spec.code_hash = Some("0".repeat(64));
        }
    }
    let summary = apply(&graph, &provider, &mut store).await;

    assert_eq!(summary.updated, vec![names::FUNCTION.to_string()]);
    assert_eq!(summary.same.len(), 10);
    assert_eq!(store.state().get(names::FUNCTION).unwrap().outputs, before);
}

#[tokio::test]
async fn switching_bus_replaces_rules_and_targets() {
    let (_dir, provider, mut store) = setup(&["acme-bus", "other-bus"]);
    apply(&pipeline("acme-bus"), &provider, &mut store).await;

    let summary = apply(&pipeline("other-bus"), &provider, &mut store).await;

    assert!(summary.is_success(), "{:?}", summary);
    assert_eq!(summary.read, vec![names::EVENT_BUS.to_string()]);
    assert!(summary.forgotten.is_empty());
    assert_eq!(summary.replaced.len(), 5);
    assert_eq!(
        store.state().get(names::EVENT_BUS).unwrap().outputs.name,
        "other-bus"
    );
    assert_eq!(
        rule_spec(&store, names::ALL_EVENTS_RULE).event_bus_name.as_value(),
        Some("other-bus")
    );
    assert_eq!(provider.live_count(), 10);
}

#[tokio::test]
async fn replaced_targets_are_deleted_before_their_rules() {
    let (_dir, provider, mut store) = setup(&["acme-bus", "other-bus"]);
    apply(&pipeline("acme-bus"), &provider, &mut store).await;
    let old_ids = |name: &str| store.state().get(name).unwrap().outputs.id.clone();
    let pairs: Vec<(String, String)> = [
        (names::ALL_EVENTS_TARGET, names::ALL_EVENTS_RULE),
        (names::FUNCTION_TARGET, names::SPECIFIC_EVENTS_RULE),
        (names::SPECIFIC_EVENTS_LOG_TARGET, names::SPECIFIC_EVENTS_RULE),
    ]
    .into_iter()
    .map(|(target, rule)| (old_ids(target), old_ids(rule)))
    .collect();
    let before = provider.calls().len();

    apply(&pipeline("other-bus"), &provider, &mut store).await;

    let calls = provider.calls().split_off(before);
    let deleted = |id: &str| {
        calls
            .iter()
            .position(|c| matches!(c, ProviderCall::Delete { id: i, .. } if i == id))
            .unwrap()
    };
    let last_delete = calls
        .iter()
        .rposition(|c| matches!(c, ProviderCall::Delete { .. }))
        .unwrap();
    let first_create = calls
        .iter()
        .position(|c| matches!(c, ProviderCall::Create { .. }))
        .unwrap();
    for (target, rule) in &pairs {
        assert!(deleted(target) < deleted(rule), "{} before {}", target, rule);
    }
    assert!(last_delete < first_create);
}

#[tokio::test]
async fn failed_target_deletion_keeps_its_rule() {
    let (_dir, provider, mut store) = setup(&["acme-bus", "other-bus"]);
    apply(&pipeline("acme-bus"), &provider, &mut store).await;
    let target_id = store
        .state()
        .get(names::ALL_EVENTS_TARGET)
        .unwrap()
        .outputs
        .id
        .clone();
    provider.fail_delete(&target_id, FakeFailure::Unauthorized);

    let summary = apply(&pipeline("other-bus"), &provider, &mut store).await;

    assert!(summary.failure(names::ALL_EVENTS_TARGET).is_some());
    assert!(summary.skipped.iter().any(|s| s == names::ALL_EVENTS_RULE));
    assert_eq!(
        rule_spec(&store, names::ALL_EVENTS_RULE).event_bus_name.as_value(),
        Some("acme-bus")
    );
    // The other rule moved to the new bus
    assert_eq!(
        rule_spec(&store, names::SPECIFIC_EVENTS_RULE)
            .event_bus_name
            .as_value(),
        Some("other-bus")
    );
}

#[tokio::test]
async fn undeclared_resources_are_deleted() {
    let (_dir, provider, mut store) = setup(&[]);
    let log_group = || {
        ResourceSpec::LogGroup(LogGroupSpec {
            retention_in_days: 1,
            tags: Default::default(),
        })
    };
    let mut both = ResourceGraph::new();
    both.declare("a", log_group()).unwrap();
    both.declare("b", log_group()).unwrap();
    apply(&both, &provider, &mut store).await;

    let mut one = ResourceGraph::new();
    one.declare("a", log_group()).unwrap();
    let summary = apply(&one, &provider, &mut store).await;

    assert_eq!(summary.deleted, vec!["b".to_string()]);
    assert_eq!(summary.same, vec!["a".to_string()]);
    assert_eq!(provider.live_count(), 1);
}

#[tokio::test]
async fn destroy_removes_everything_in_reverse_order() {
    let (_dir, provider, mut store) = setup(&["acme-bus"]);
    apply(&pipeline("acme-bus"), &provider, &mut store).await;

    let plan = Plan::destroy(store.state());
    let summary = Executor::new(provider.clone())
        .destroy(&plan, &mut store)
        .await
        .unwrap();

    assert!(summary.is_success(), "{:?}", summary);
    assert_eq!(summary.deleted.len(), 10);
    assert_eq!(summary.forgotten, vec![names::EVENT_BUS.to_string()]);
    assert!(store.state().is_empty());
    assert_eq!(provider.live_count(), 0);

    let deletes: Vec<ResourceKind> = provider
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            ProviderCall::Delete { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    let last_target = deletes
        .iter()
        .rposition(|k| *k == ResourceKind::EventTarget)
        .unwrap();
    let first_rule = deletes
        .iter()
        .position(|k| *k == ResourceKind::EventRule)
        .unwrap();
    let function = deletes
        .iter()
        .position(|k| *k == ResourceKind::Function)
        .unwrap();
    let role = deletes.iter().position(|k| *k == ResourceKind::Role).unwrap();
    assert!(last_target < first_rule);
    assert!(last_target < function);
    assert!(function < role);
}

#[tokio::test]
async fn cancelled_apply_starts_nothing() {
    let (_dir, provider, mut store) = setup(&["acme-bus"]);
    let graph = pipeline("acme-bus");
    let plan = Plan::compute(&graph, store.state());
    let flag = Arc::new(AtomicBool::new(true));

    let summary = Executor::new(provider.clone())
        .with_cancel(flag)
        .apply(&graph, &plan, &mut store)
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert!(!summary.is_success());
    assert!(provider.calls().is_empty());
    assert!(store.state().is_empty());
}
