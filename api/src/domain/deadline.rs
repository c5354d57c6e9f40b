//! Explicit deadlines
//!
//! A lookup gets one outer deadline. Every stage derives its own, tighter
//! deadline from the one it was handed, so an inner call can never outlive
//! the caller.

use std::future::Future;
use std::time::Duration;

use tokio::time::{error::Elapsed, Instant};

/// Absolute point in time by which work must finish
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    /// The earlier of this deadline and `timeout` from now
    pub fn child(&self, timeout: Duration) -> Self {
        Self(self.0.min(Instant::now() + timeout))
    }

    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Drive `fut` until it completes or the deadline passes.
    ///
    /// On expiry the future is dropped, cancelling any in-flight I/O.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Elapsed>
    where
        F: Future,
    {
        tokio::time::timeout_at(self.0, fut).await
    }
}
