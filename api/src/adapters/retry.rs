//! Bounded retry with linear backoff for transport-level failures.
//!
//! The caller decides what counts as a transport failure: the operation
//! returns `Err` only when no response was obtained. A received response,
//! whatever its status, is returned as `Ok` and ends the loop.
//!
//! Backoff is linear: the wait before attempt `n + 1` is `n * backoff_step`,
//! i.e. 100ms then 200ms with the defaults. No attempt or backoff sleep is
//! started past the deadline.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::domain::Deadline;

/// Default number of attempts, including the first one
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default backoff unit
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(100);

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed
    pub max_attempts: u32,
    /// Delay multiplied by the number of the attempt that just failed
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }
}

impl RetryPolicy {
    /// State for a fresh call, positioned at attempt 1
    pub fn start(&self) -> RetryState {
        RetryState {
            attempt: 1,
            max_attempts: self.max_attempts.max(1),
            backoff_step: self.backoff_step,
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Wait this long, then make the next attempt
    Retry(Duration),
    /// No attempts left
    Exhausted,
}

/// Per-call retry counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    backoff_step: Duration,
}

impl RetryState {
    /// The attempt currently being made (1-based)
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record that the current attempt failed and decide the next step
    pub fn next_step(&mut self) -> RetryStep {
        if self.attempt >= self.max_attempts {
            return RetryStep::Exhausted;
        }
        let delay = self.backoff_step * self.attempt;
        self.attempt += 1;
        RetryStep::Retry(delay)
    }
}

/// Why a retried operation gave up
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    #[error("deadline elapsed during attempt {attempt}")]
    DeadlineElapsed { attempt: u32 },
}

/// Run `operation` until it succeeds, attempts run out, or `deadline` passes.
///
/// `operation` receives the 1-based attempt number.
pub async fn with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    deadline: Deadline,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut state = policy.start();

    loop {
        let attempt = state.attempt();
        if deadline.is_expired() {
            return Err(RetryError::DeadlineElapsed { attempt });
        }

        let error = match deadline.run(operation(attempt)).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e,
            Err(_) => {
                tracing::warn!(attempt, "Attempt cut off by deadline");
                return Err(RetryError::DeadlineElapsed { attempt });
            }
        };

        match state.next_step() {
            RetryStep::Exhausted => {
                tracing::warn!(attempt, error = %error, "Attempt failed, no retries left");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }
            RetryStep::Retry(delay) => {
                tracing::warn!(
                    attempt,
                    error = %error,
                    backoff_ms = delay.as_millis() as u64,
                    "Attempt failed, retrying"
                );
                if deadline.run(tokio::time::sleep(delay)).await.is_err() {
                    return Err(RetryError::DeadlineElapsed {
                        attempt: state.attempt(),
                    });
                }
            }
        }
    }
}
