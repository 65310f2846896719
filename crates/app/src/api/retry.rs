//! Retry with exponential backoff.

use std::{fmt::Display, future::Future, time::Duration};

use tracing::warn;

/// How many times to try an operation and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,

    /// Delay before the second attempt; doubled after each failure
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Run `operation` until it succeeds or the policy's attempts run out. The
/// last failure is returned.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt >= attempts => return Err(error),
            Err(error) => {
                warn!(%error, attempt, ?delay, "{what} failed, retrying");

                tokio::time::sleep(delay).await;

                delay = delay.saturating_mul(2);
                attempt += 1;
            }
        }
    }
}
