mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{no_delay, recording_delay};
use webhook_notifier::{retry_with_backoff, Backoff, RetryOutcome};

fn backoff(base_ms: u64, max_ms: u64) -> Backoff {
    Backoff {
        base: Duration::from_millis(base_ms),
        max: Duration::from_millis(max_ms),
        jitter: Duration::ZERO,
    }
}

#[test]
fn schedule_is_monotonic_and_capped() {
    let backoff = backoff(100, 1_000);
    let delays: Vec<Duration> = (1..=8).map(|attempt| backoff.delay_for(attempt)).collect();

    for pair in delays.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert_eq!(delays[0], Duration::from_millis(100));
    assert_eq!(delays[1], Duration::from_millis(200));
    assert!(delays.iter().all(|d| *d <= Duration::from_millis(1_000)));
    assert_eq!(delays[7], Duration::from_millis(1_000));
}

#[test]
fn jitter_never_pushes_a_delay_past_the_cap() {
    let backoff = Backoff {
        base: Duration::from_millis(100),
        max: Duration::from_millis(300),
        jitter: Duration::from_millis(500),
    };

    for attempt in 1..=10 {
        assert!(backoff.delay_for(attempt) <= Duration::from_millis(300));
    }
}

#[test]
fn capped_at_lowers_the_bound() {
    let capped = backoff(100, 30_000).capped_at(Duration::from_millis(150));
    assert_eq!(capped.delay_for(5), Duration::from_millis(150));
}

#[tokio::test]
async fn first_success_skips_the_failure_hook() {
    let hook_calls = Arc::new(Mutex::new(0u32));
    let hook_calls_inner = hook_calls.clone();

    let outcome: RetryOutcome<&str, &str> = retry_with_backoff(
        5,
        &backoff(1, 10),
        &no_delay(),
        |_| async { Ok("done") },
        |_| true,
        move |_, _| *hook_calls_inner.lock().unwrap() += 1,
    )
    .await;

    assert!(matches!(outcome, RetryOutcome::Success { value: "done", attempts: 1 }));
    assert_eq!(*hook_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn exhaustion_invokes_hook_for_every_non_final_failure() {
    let hook_calls = Arc::new(Mutex::new(Vec::new()));
    let hook_calls_inner = hook_calls.clone();
    let delays = Arc::new(Mutex::new(Vec::new()));

    let outcome: RetryOutcome<(), &str> = retry_with_backoff(
        3,
        &backoff(10, 1_000),
        &recording_delay(delays.clone()),
        |_| async { Err("boom") },
        |_| true,
        move |attempt, _| hook_calls_inner.lock().unwrap().push(attempt),
    )
    .await;

    assert!(matches!(outcome, RetryOutcome::Exhausted { last_error: "boom", attempts: 3 }));
    assert_eq!(*hook_calls.lock().unwrap(), vec![1, 2]);
    assert_eq!(*delays.lock().unwrap(), vec![
        Duration::from_millis(10),
        Duration::from_millis(20),
    ]);
}

#[tokio::test]
async fn non_retryable_error_stops_immediately() {
    let attempts_seen = Arc::new(Mutex::new(0u32));
    let attempts_inner = attempts_seen.clone();

    let outcome: RetryOutcome<(), &str> = retry_with_backoff(
        10,
        &backoff(1, 10),
        &no_delay(),
        move |_| {
            *attempts_inner.lock().unwrap() += 1;
            async { Err("fatal") }
        },
        |err| *err != "fatal",
        |_, _| {},
    )
    .await;

    assert!(matches!(outcome, RetryOutcome::Exhausted { attempts: 1, .. }));
    assert_eq!(*attempts_seen.lock().unwrap(), 1);
}

#[tokio::test]
async fn zero_max_attempts_is_treated_as_one() {
    let outcome: RetryOutcome<(), &str> = retry_with_backoff(
        0,
        &backoff(1, 10),
        &no_delay(),
        |_| async { Err("boom") },
        |_| true,
        |_, _| {},
    )
    .await;

    assert!(matches!(outcome, RetryOutcome::Exhausted { attempts: 1, .. }));
}
