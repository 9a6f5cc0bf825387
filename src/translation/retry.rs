/*!
 * Retry with exponential backoff.
 *
 * One loop shared by every call site that talks to the provider: the
 * per-chunk translation call and the raw HTTP send inside the client.
 * Each invocation owns its own attempt counter and backoff, so nothing
 * leaks between chunks or between the two layers.
 */

use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Attempts used when the configured value is not positive
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Backoff before the first retry
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(2);

/// Attempt ceiling and backoff schedule for one call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Build a policy from a configured attempt count.
    ///
    /// Values `<= 0` select [`DEFAULT_MAX_ATTEMPTS`].
    pub fn new(max_attempts: i32) -> Self {
        let max_attempts = if max_attempts <= 0 {
            DEFAULT_MAX_ATTEMPTS
        } else {
            max_attempts as u32
        };

        Self {
            max_attempts,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Replace the initial backoff
    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Sleep taken before the given 0-based attempt.
    ///
    /// Zero for the first attempt, then `initial`, `2 * initial`, `4 * initial`...
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let doublings = (attempt - 1).min(31);
        self.initial_backoff.saturating_mul(1u32 << doublings)
    }
}

/// Run `operation` until it succeeds or the policy's attempts are spent.
///
/// Returns the first success, or the error of the last attempt. `label`
/// only feeds the retry log line.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    return Err(e);
                }

                let delay = policy.backoff_before(attempt);
                warn!(
                    "Retrying {} (attempt {}/{}) in {:?} after error: {}",
                    label,
                    attempt + 1,
                    policy.max_attempts,
                    delay,
                    e
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
