//! Tests for the job poller: terminal states, timeout, cancellation, backoff.

#![allow(clippy::expect_used)]

use std::time::Duration;

use proptest::prelude::*;
use stratus_cli::application::services::job_poller::poll_job;
use stratus_cli::domain::{ApiError, JobState, JobUrl, PollPolicy, Reply, Warnings};
use tokio_util::sync::CancellationToken;

use crate::mocks::{FakeClock, FakeGateway};

fn job() -> JobUrl {
    JobUrl::new("some-job-url")
}

#[tokio::test]
async fn test_poll_job_succeeds_after_processing() {
    let gateway = FakeGateway::new()
        .with_status(Reply::ok(JobState::Processing, Warnings::new()))
        .with_status(Reply::ok(JobState::Processing, Warnings::new()))
        .with_status(Reply::ok(JobState::Succeeded, Warnings::new()));
    let clock = FakeClock::new();

    let reply = poll_job(
        &gateway,
        &clock,
        &PollPolicy::default(),
        &CancellationToken::new(),
        &job(),
    )
    .await;

    assert_eq!(reply.result, Ok(()));
    assert_eq!(gateway.status_count(), 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn test_poll_job_reports_remote_failure_verbatim() {
    let gateway = FakeGateway::new().with_status(Reply::ok(
        JobState::Failed("Staging failed: buildpack exited 223".to_string()),
        Warnings::new(),
    ));

    let reply = poll_job(
        &gateway,
        &FakeClock::new(),
        &PollPolicy::default(),
        &CancellationToken::new(),
        &job(),
    )
    .await;

    assert_eq!(
        reply.result,
        Err(ApiError::RemoteJobFailed {
            reason: "Staging failed: buildpack exited 223".to_string()
        })
    );
}

#[tokio::test]
async fn test_poll_job_times_out_when_always_processing() {
    let gateway = FakeGateway::new();
    let clock = FakeClock::new();

    let reply = poll_job(
        &gateway,
        &clock,
        &PollPolicy::default(),
        &CancellationToken::new(),
        &job(),
    )
    .await;

    match reply.result {
        Err(ApiError::JobTimeout { job_url, waited }) => {
            assert_eq!(job_url, "some-job-url");
            assert_eq!(waited, Duration::from_secs(600));
        }
        other => panic!("expected JobTimeout, got {other:?}"),
    }
    // The final wait is clipped so the budget is never overshot.
    assert_eq!(clock.total_slept(), Duration::from_secs(600));
    assert_eq!(clock.sleeps().last(), Some(&Duration::from_secs(29)));
    assert_eq!(gateway.status_count(), clock.sleeps().len() + 1);
}

#[tokio::test]
async fn test_poll_job_cancelled_during_wait() {
    let cancel = CancellationToken::new();
    let gateway = FakeGateway::new();
    let clock = FakeClock::new().cancelling_on_sleep(2, cancel.clone());

    let reply = poll_job(&gateway, &clock, &PollPolicy::default(), &cancel, &job()).await;

    assert_eq!(reply.result, Err(ApiError::Cancelled));
    assert_eq!(gateway.status_count(), 2);
}

#[tokio::test]
async fn test_poll_job_already_cancelled_makes_no_query() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let gateway = FakeGateway::new();

    let reply = poll_job(
        &gateway,
        &FakeClock::new(),
        &PollPolicy::default(),
        &cancel,
        &job(),
    )
    .await;

    assert_eq!(reply.result, Err(ApiError::Cancelled));
    assert_eq!(gateway.status_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_poll_job_cancelled_during_slow_status_query() {
    let cancel = CancellationToken::new();
    let gateway = FakeGateway::new()
        .with_status(Reply::ok(JobState::Processing, vec!["w1"]))
        .with_status_delay(Duration::from_secs(60));
    let started = tokio::time::Instant::now();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(90)).await;
        trigger.cancel();
    });

    // First query answers at 60s; the second is still in flight at 90s.
    let reply = poll_job(
        &gateway,
        &FakeClock::new(),
        &PollPolicy::default(),
        &cancel,
        &job(),
    )
    .await;

    assert_eq!(reply.result, Err(ApiError::Cancelled));
    assert_eq!(reply.warnings, Warnings::from(vec!["w1"]));
    assert_eq!(gateway.status_count(), 2);
    let took = started.elapsed();
    assert!(
        took >= Duration::from_secs(90) && took < Duration::from_secs(91),
        "returned after {took:?}"
    );
}

#[tokio::test]
async fn test_poll_job_keeps_duplicate_warnings_from_each_query() {
    let gateway = FakeGateway::new()
        .with_status(Reply::ok(JobState::Processing, vec!["still going"]))
        .with_status(Reply::ok(JobState::Processing, vec!["still going"]))
        .with_status(Reply::ok(JobState::Succeeded, vec!["done"]));

    let reply = poll_job(
        &gateway,
        &FakeClock::new(),
        &PollPolicy::default(),
        &CancellationToken::new(),
        &job(),
    )
    .await;

    assert_eq!(
        reply.warnings,
        Warnings::from(vec!["still going", "still going", "done"])
    );
}

#[tokio::test]
async fn test_poll_job_status_query_error_ends_polling() {
    let gateway = FakeGateway::new()
        .with_status(Reply::ok(JobState::Processing, vec!["w1"]))
        .with_status(Reply::err(
            ApiError::Transport("connection reset".to_string()),
            vec!["w2"],
        ));

    let reply = poll_job(
        &gateway,
        &FakeClock::new(),
        &PollPolicy::default(),
        &CancellationToken::new(),
        &job(),
    )
    .await;

    assert_eq!(
        reply.result,
        Err(ApiError::Transport("connection reset".to_string()))
    );
    assert_eq!(reply.warnings, Warnings::from(vec!["w1", "w2"]));
    assert_eq!(gateway.status_count(), 2);
}

#[tokio::test]
async fn test_poll_job_on_completed_job_is_idempotent() {
    for _ in 0..2 {
        let gateway =
            FakeGateway::new().with_status(Reply::ok(JobState::Succeeded, Warnings::new()));
        let clock = FakeClock::new();

        let reply = poll_job(
            &gateway,
            &clock,
            &PollPolicy::default(),
            &CancellationToken::new(),
            &job(),
        )
        .await;

        assert_eq!(reply.result, Ok(()));
        assert_eq!(gateway.status_count(), 1);
        assert!(clock.sleeps().is_empty());
    }
}

#[tokio::test]
async fn test_poll_job_zero_budget_still_queries_once() {
    let gateway = FakeGateway::new();
    let policy = PollPolicy {
        timeout: Duration::ZERO,
        ..PollPolicy::default()
    };

    let reply = poll_job(
        &gateway,
        &FakeClock::new(),
        &policy,
        &CancellationToken::new(),
        &job(),
    )
    .await;

    assert!(matches!(reply.result, Err(ApiError::JobTimeout { .. })));
    assert_eq!(gateway.status_count(), 1);
}

proptest! {
    #[test]
    fn prop_backoff_never_exceeds_cap_and_never_shrinks(
        initial_ms in 1u64..5_000,
        max_ms in 1u64..60_000,
        steps in 1usize..40,
    ) {
        let policy = PollPolicy {
            initial_interval: Duration::from_millis(initial_ms),
            max_interval: Duration::from_millis(max_ms),
            timeout: Duration::from_secs(600),
        };
        let delays: Vec<Duration> = policy.backoff().take(steps).collect();
        for pair in delays.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        for d in &delays {
            prop_assert!(*d <= policy.max_interval);
            prop_assert!(!d.is_zero());
        }
    }

    #[test]
    fn prop_clip_never_overshoots_budget(
        interval_ms in 0u64..60_000,
        elapsed_ms in 0u64..700_000,
    ) {
        let policy = PollPolicy::default();
        let interval = Duration::from_millis(interval_ms);
        let elapsed = Duration::from_millis(elapsed_ms);
        match policy.clip(interval, elapsed) {
            Some(wait) => {
                prop_assert!(elapsed < policy.timeout);
                prop_assert!(elapsed + wait <= policy.timeout);
                prop_assert!(wait <= interval);
            }
            None => prop_assert!(elapsed >= policy.timeout),
        }
    }
}
