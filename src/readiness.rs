//! Bounded poll-with-timeout readiness checks.
//!
//! Third-party renderers and widgets produce their output asynchronously
//! and give no completion signal. [`poll_until`] repeatedly evaluates a
//! caller-supplied predicate on a fixed cadence until it reports ready or
//! the time budget is spent.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::error::{Result, SiteError};

/// Smallest interval used between checks.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Cadence and budget for a readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Time between checks.
    pub interval: Duration,
    /// Total time budget, measured from the first check.
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            timeout: Duration::from_millis(1_000),
        }
    }
}

impl PollOptions {
    /// Validates these options.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Config`] if the interval or timeout is zero, or
    /// the interval exceeds the timeout.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(SiteError::Config(
                "poll interval must be greater than 0".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(SiteError::Config(
                "poll timeout must be greater than 0".into(),
            ));
        }
        if self.interval > self.timeout {
            return Err(SiteError::Config(
                "poll interval must not exceed the timeout".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The predicate returned true.
    Ready {
        /// Number of predicate evaluations, including the successful one.
        attempts: u32,
        /// Time from the first check to the successful one.
        elapsed: Duration,
    },
    /// The budget ran out first.
    TimedOut {
        /// Number of predicate evaluations.
        attempts: u32,
    },
}

impl Readiness {
    /// Returns true if the predicate succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Convert to a `Result`, naming what was waited for in the error.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Timeout`] for [`Readiness::TimedOut`].
    pub fn into_result(self, what: &str) -> Result<Duration> {
        match self {
            Self::Ready { elapsed, .. } => Ok(elapsed),
            Self::TimedOut { attempts } => Err(SiteError::Timeout(format!(
                "{what} not ready after {attempts} checks"
            ))),
        }
    }
}

/// Poll a synchronous predicate until it returns true or `options.timeout`
/// elapses.
///
/// The predicate is evaluated immediately, then once per interval. A final
/// evaluation happens at the deadline.
pub async fn poll_until<F>(mut ready: F, options: PollOptions) -> Readiness
where
    F: FnMut() -> bool,
{
    poll_until_async(move || std::future::ready(ready()), options).await
}

/// Poll an asynchronous predicate until it resolves to true or
/// `options.timeout` elapses.
pub async fn poll_until_async<F, Fut>(mut ready: F, options: PollOptions) -> Readiness
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let interval = options.interval.max(MIN_INTERVAL);
    let start = Instant::now();
    let deadline = start + options.timeout;
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);
        if ready().await {
            let elapsed = start.elapsed();
            tracing::debug!(attempts, ?elapsed, "readiness check passed");
            return Readiness::Ready { attempts, elapsed };
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(attempts, timeout = ?options.timeout, "readiness check timed out");
            return Readiness::TimedOut { attempts };
        }
        sleep(interval.min(deadline - now)).await;
    }
}
