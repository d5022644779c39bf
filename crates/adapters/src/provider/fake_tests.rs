// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ebx_core::{EventBusSpec, Input, LogGroupSpec};

fn bus_request(name: &str) -> ResourceRequest {
    ResourceRequest::new(
        name,
        ResourceSpec::EventBus(EventBusSpec {
            name: Input::value(name),
        }),
    )
}

fn log_group_request(name: &str) -> ResourceRequest {
    ResourceRequest::new(
        name,
        ResourceSpec::LogGroup(LogGroupSpec {
            retention_in_days: 1,
            tags: BTreeMap::new(),
        }),
    )
}

#[tokio::test]
async fn read_known_bus() {
    let provider = FakeProvider::new().with_buses(&["acme-bus"]);
    let outputs = provider.read(&bus_request("acme-bus")).await.unwrap();
    assert_eq!(outputs.name, "acme-bus");
    assert_eq!(
        provider.calls(),
        vec![ProviderCall::Read {
            name: "acme-bus".to_string()
        }]
    );
}

#[tokio::test]
async fn read_unknown_bus_is_not_found() {
    let provider = FakeProvider::new();
    assert!(matches!(
        provider.read(&bus_request("missing")).await,
        Err(ProviderError::NotFound { .. })
    ));
}

#[tokio::test]
async fn create_then_delete() {
    let provider = FakeProvider::new();
    let outputs = provider
        .create(&log_group_request("Adobe-all-events"))
        .await
        .unwrap();
    assert_eq!(outputs.name, "Adobe-all-events-0000001");
    assert_eq!(provider.live(ResourceKind::LogGroup).len(), 1);

    provider
        .delete(ResourceKind::LogGroup, &outputs)
        .await
        .unwrap();
    assert_eq!(provider.live_count(), 0);
}

#[tokio::test]
async fn delete_unknown_is_not_found() {
    let provider = FakeProvider::new();
    let outputs = ResourceOutputs {
        id: "ghost".to_string(),
        name: "ghost".to_string(),
        arn: None,
    };
    assert!(provider
        .delete(ResourceKind::LogGroup, &outputs)
        .await
        .is_err());
}

#[tokio::test]
async fn injected_failure_applies_to_logical_name() {
    let provider = FakeProvider::new();
    provider.fail_with("Adobe-all-events", FakeFailure::Unauthorized);

    assert!(matches!(
        provider.create(&log_group_request("Adobe-all-events")).await,
        Err(ProviderError::Unauthorized { .. })
    ));
    assert!(provider
        .create(&log_group_request("Adobe-specific-events"))
        .await
        .is_ok());

    provider.clear_failures();
    assert!(provider
        .create(&log_group_request("Adobe-all-events"))
        .await
        .is_ok());
}

#[tokio::test]
async fn injected_delete_failure_keeps_resource_live() {
    let provider = FakeProvider::new();
    let outputs = provider
        .create(&log_group_request("Adobe-all-events"))
        .await
        .unwrap();
    provider.fail_delete(&outputs.id, FakeFailure::Conflict);

    assert!(matches!(
        provider.delete(ResourceKind::LogGroup, &outputs).await,
        Err(ProviderError::Conflict { .. })
    ));
    assert_eq!(provider.live_count(), 1);

    provider.clear_failures();
    provider
        .delete(ResourceKind::LogGroup, &outputs)
        .await
        .unwrap();
    assert_eq!(provider.live_count(), 0);
}

#[tokio::test]
async fn update_requires_live_resource() {
    let provider = FakeProvider::new();
    let request = log_group_request("Adobe-all-events");
    let created = provider.create(&request).await.unwrap();
    let updated = provider.update(&request, &created).await.unwrap();
    assert_eq!(created, updated);

    provider
        .delete(ResourceKind::LogGroup, &created)
        .await
        .unwrap();
    assert!(matches!(
        provider.update(&request, &created).await,
        Err(ProviderError::NotFound { .. })
    ));
}

#[tokio::test]
async fn validation_runs_before_create() {
    let provider = FakeProvider::new();
    let request = ResourceRequest::new(
        "logs",
        ResourceSpec::LogGroup(LogGroupSpec {
            retention_in_days: 2,
            tags: BTreeMap::new(),
        }),
    );
    assert!(provider.create(&request).await.is_err());
    assert_eq!(provider.live_count(), 0);
}
