use std::time::Duration;

use responses_api::retry::{classify_status, Failure, RetryPolicy};

#[test]
fn server_side_statuses_are_transient() {
    for status in [408, 429, 500, 502, 503, 504] {
        assert_eq!(classify_status(status, ""), Failure::Transient, "status {status}");
    }
}

#[test]
fn overload_wording_makes_a_client_status_transient() {
    assert_eq!(
        classify_status(400, "The engine is currently overloaded"),
        Failure::Transient
    );
    assert_eq!(classify_status(400, "Rate limit reached for gpt-5.1"), Failure::Transient);
}

#[test]
fn bad_requests_and_exhausted_quota_are_permanent() {
    assert_eq!(classify_status(400, "invalid model"), Failure::Permanent);
    assert_eq!(classify_status(401, ""), Failure::Permanent);
    assert_eq!(
        classify_status(
            429,
            r#"{"error":{"code":"insufficient_quota","message":"You exceeded your current quota"}}"#
        ),
        Failure::Permanent
    );
}

#[test]
fn backoff_doubles_until_the_cap() {
    let policy = RetryPolicy {
        retries: 5,
        initial_backoff: Duration::from_millis(500),
        max_backoff: Duration::from_secs(3),
    };

    let pauses: Vec<_> = (0..5)
        .map(|attempt| policy.next_backoff(attempt, Failure::Transient))
        .collect();
    assert_eq!(
        pauses,
        vec![
            Some(Duration::from_millis(500)),
            Some(Duration::from_secs(1)),
            Some(Duration::from_secs(2)),
            Some(Duration::from_secs(3)),
            Some(Duration::from_secs(3)),
        ]
    );
    assert_eq!(policy.next_backoff(5, Failure::Transient), None);
}

#[test]
fn permanent_failures_and_disabled_policy_never_wait() {
    assert_eq!(RetryPolicy::default().next_backoff(0, Failure::Permanent), None);
    assert_eq!(RetryPolicy::never().next_backoff(0, Failure::Transient), None);
    assert_eq!(RetryPolicy::never().attempts(), 1);
    assert_eq!(RetryPolicy::default().attempts(), 4);
}
