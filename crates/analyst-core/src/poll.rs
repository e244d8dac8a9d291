//! Bounded retry-with-timeout primitive
//!
//! Remote "processing" states are awaited with a fixed number of attempts at
//! a fixed interval, never an open-ended sleep loop. Each attempt reports
//! whether the remote side is ready, still pending, or has failed.

use std::future::Future;
use std::time::Duration;

/// Result of one polling attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep<T> {
    Ready(T),
    Pending,
    Failed(String),
}

/// Final outcome of a bounded poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    /// All attempts were used up while the remote side stayed pending
    TimedOut,
    Failed(String),
}

/// Run `step` up to `max_attempts` times, sleeping `interval` between
/// attempts. Stops early on `Ready` or `Failed`.
pub async fn poll<T, F, Fut>(
    max_attempts: u32,
    interval: Duration,
    mut step: F,
) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollStep<T>>,
{
    for attempt in 0..max_attempts {
        match step().await {
            PollStep::Ready(value) => return PollOutcome::Ready(value),
            PollStep::Failed(reason) => return PollOutcome::Failed(reason),
            PollStep::Pending => {
                tracing::trace!(attempt, max_attempts, "still pending");
            },
        }
        if attempt + 1 < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    PollOutcome::TimedOut
}
