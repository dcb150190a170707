//! When a failed `/responses` call is worth sending again, and how long to wait.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

/// How a failed attempt is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Likely to clear on its own: rate limits, overloaded or unreachable upstream.
    Transient,
    /// Sending the same request again cannot help.
    Permanent,
}

/// Classifies a non-success HTTP answer by status and body text.
///
/// Exhausted quota comes back as 429 too but never clears by waiting, so the
/// body is checked for it first.
#[must_use]
pub fn classify_status(status: u16, body: &str) -> Failure {
    if quota_pattern().is_match(body) {
        return Failure::Permanent;
    }
    if matches!(status, 408 | 429 | 500..=599) || transient_pattern().is_match(body) {
        Failure::Transient
    } else {
        Failure::Permanent
    }
}

/// Connection and timeout errors are transient; anything else reqwest reports is not.
#[must_use]
pub fn classify_transport(error: &reqwest::Error) -> Failure {
    if error.is_connect() || error.is_timeout() {
        Failure::Transient
    } else {
        Failure::Permanent
    }
}

/// Retry budget with capped exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    /// A policy that sends every request exactly once.
    #[must_use]
    pub fn never() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    /// Total number of attempts, the first one included.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.retries + 1
    }

    /// Pause before attempt `failed_attempt + 1`, or `None` once the budget is spent
    /// or the failure is permanent. `failed_attempt` counts from zero.
    #[must_use]
    pub fn next_backoff(&self, failed_attempt: u32, failure: Failure) -> Option<Duration> {
        if failure == Failure::Permanent || failed_attempt >= self.retries {
            return None;
        }
        let factor = 1u32.checked_shl(failed_attempt).unwrap_or(u32::MAX);
        Some(
            self.initial_backoff
                .saturating_mul(factor)
                .min(self.max_backoff),
        )
    }
}

fn transient_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)rate.?limit|overloaded|temporarily unavailable|upstream connect|connection refused")
            .expect("static pattern compiles")
    })
}

fn quota_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)insufficient.?quota|billing.?(hard.?)?limit")
            .expect("static pattern compiles")
    })
}
