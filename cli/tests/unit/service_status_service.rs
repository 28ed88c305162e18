//! Tests for assembling a service instance's composite status.

#![allow(clippy::expect_used)]

use std::time::Duration;

use stratus_cli::application::services::service_status::{
    describe_service_instance, service_instance_guid,
};
use stratus_cli::domain::{ApiError, Reply, Section, Warnings};

use crate::mocks::{
    Call, FakeGateway, SectionDelays, last_operation, managed_instance, sharing,
    user_provided_instance,
};

fn fully_scripted() -> FakeGateway {
    FakeGateway::new()
        .with_instance(Reply::ok(managed_instance(), vec!["core-warning"]))
        .with_bound_apps(Reply::ok(vec!["app-a".to_string()], Warnings::new()))
        .with_sharing(Reply::ok(sharing(), Warnings::new()))
        .with_last_operation(Reply::ok(last_operation(), Warnings::new()))
}

#[tokio::test]
async fn test_describe_all_sections_present() {
    let gateway = fully_scripted();

    let reply = describe_service_instance(&gateway, "some-service", "some-space-guid").await;

    let status = reply.result.expect("core lookup succeeded");
    assert_eq!(status.present_sections(), Section::ORDER.to_vec());
    assert_eq!(status.bound_apps, Some(vec!["app-a".to_string()]));
    assert_eq!(reply.warnings, Warnings::from(vec!["core-warning"]));
}

#[tokio::test]
async fn test_describe_core_failure_skips_sub_queries() {
    let gateway = FakeGateway::new().with_instance(Reply::err(
        ApiError::not_found("Service instance", "some-service"),
        vec!["core-warning"],
    ));

    let reply = describe_service_instance(&gateway, "some-service", "some-space-guid").await;

    assert_eq!(
        reply.result,
        Err(ApiError::not_found("Service instance", "some-service"))
    );
    assert_eq!(reply.warnings, Warnings::from(vec!["core-warning"]));
    assert_eq!(
        gateway.calls(),
        vec![Call::FindServiceInstance {
            name: "some-service".to_string(),
            space_guid: "some-space-guid".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_describe_not_applicable_sections_are_absent_without_warning() {
    let gateway = FakeGateway::new()
        .with_instance(Reply::ok(user_provided_instance(), Warnings::new()))
        .with_bound_apps(Reply::ok(Vec::new(), Warnings::new()))
        .with_sharing(Reply::err(ApiError::NotApplicable, Warnings::new()))
        .with_last_operation(Reply::err(ApiError::NotApplicable, Warnings::new()));

    let reply = describe_service_instance(&gateway, "some-service", "some-space-guid").await;

    let status = reply.result.expect("core lookup succeeded");
    assert_eq!(
        status.present_sections(),
        vec![Section::BasicInfo, Section::Bindings]
    );
    assert!(status.sharing.is_none());
    assert!(status.last_operation.is_none());
    assert!(reply.warnings.is_empty());
}

#[tokio::test]
async fn test_describe_failed_sub_query_becomes_warning() {
    let gateway = fully_scripted().with_sharing(Reply::err(
        ApiError::Transport("connection refused".to_string()),
        vec!["sharing-warning"],
    ));

    let reply = describe_service_instance(&gateway, "some-service", "some-space-guid").await;

    let status = reply.result.expect("partial failure is still a success");
    assert!(status.sharing.is_none());
    assert!(status.bound_apps.is_some());
    assert!(status.last_operation.is_some());
    assert_eq!(reply.warnings.len(), 3);
    assert_eq!(reply.warnings.as_slice()[0], "core-warning");
    assert_eq!(reply.warnings.as_slice()[1], "sharing-warning");
    assert!(reply.warnings.as_slice()[2].contains("connection refused"));
    assert!(reply.warnings.as_slice()[2].contains("sharing information"));
}

#[tokio::test(start_paused = true)]
async fn test_describe_warnings_follow_section_order_not_completion_order() {
    let delays = SectionDelays {
        bound_apps: Duration::from_millis(300),
        sharing: Duration::from_millis(100),
        last_operation: Duration::from_millis(200),
    };
    let gateway = FakeGateway::new()
        .with_instance(Reply::ok(managed_instance(), Warnings::new()))
        .with_bound_apps(Reply::ok(Vec::new(), vec!["bindings"]))
        .with_sharing(Reply::ok(sharing(), vec!["sharing"]))
        .with_last_operation(Reply::ok(last_operation(), vec!["last-operation"]))
        .with_delays(delays);

    let reply = describe_service_instance(&gateway, "some-service", "some-space-guid").await;

    assert!(reply.is_ok());
    assert_eq!(
        reply.warnings,
        Warnings::from(vec!["bindings", "sharing", "last-operation"])
    );
    // Sub-queries ran concurrently: they finished in latency order.
    let finished: Vec<Call> = gateway.calls().into_iter().skip(1).collect();
    assert_eq!(
        finished,
        vec![Call::GetSharing, Call::GetLastOperation, Call::ListBoundApps]
    );
}

#[tokio::test(start_paused = true)]
async fn test_describe_sub_queries_overlap_in_time() {
    let delays = SectionDelays {
        bound_apps: Duration::from_secs(1),
        sharing: Duration::from_secs(1),
        last_operation: Duration::from_secs(1),
    };
    let gateway = fully_scripted().with_delays(delays);
    let started = tokio::time::Instant::now();

    let reply = describe_service_instance(&gateway, "some-service", "some-space-guid").await;

    assert!(reply.is_ok());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_service_instance_guid_returns_guid_and_warnings() {
    let gateway = fully_scripted();

    let reply = service_instance_guid(&gateway, "some-service", "some-space-guid").await;

    assert_eq!(reply.result, Ok("some-instance-guid".to_string()));
    assert_eq!(reply.warnings, Warnings::from(vec!["core-warning"]));
    assert_eq!(gateway.calls().len(), 1);
}
