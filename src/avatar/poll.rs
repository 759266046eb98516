//! StatusPoller - waits for a job to reach a terminal state.
//!
//! Layered on top of [`AvatarOrchestrator::check_video_status`]; the
//! orchestrator itself never waits.

use std::time::Duration;

use tokio::time::Instant;

use super::error::AvatarError;
use super::orchestrator::AvatarOrchestrator;
use super::provider::JobHandle;
use super::status::AnimationResponse;

/// Default polling interval for status checks (2 seconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default upper bound on how long to wait for a video (120 seconds).
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(120);

/// Shortest interval the poller will wait between status checks.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPoller {
    interval: Duration,
    max_wait: Duration,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT)
    }
}

impl StatusPoller {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            max_wait,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Poll `handle` until it completes or fails.
    ///
    /// A failed job is returned as a normal response with `success: false`.
    ///
    /// # Errors
    ///
    /// Returns `AvatarError::Timeout` if the job is still processing after
    /// `max_wait`.
    pub async fn wait(
        &self,
        orchestrator: &AvatarOrchestrator,
        handle: &JobHandle,
    ) -> Result<AnimationResponse, AvatarError> {
        let start = Instant::now();

        loop {
            let response = orchestrator.check_job(handle).await;
            if response.status.is_terminal() {
                return Ok(response);
            }

            let elapsed = start.elapsed();
            if elapsed >= self.max_wait {
                log::error!(
                    "{} job {} still processing after {:?}",
                    handle.provider,
                    handle.job_id,
                    elapsed
                );
                return Err(AvatarError::Timeout { waited: elapsed });
            }

            log::debug!(
                "{} job {} is {}, checking again in {:?}",
                handle.provider,
                handle.job_id,
                response.status.as_str(),
                self.interval
            );
            tokio::time::sleep(self.interval.min(self.max_wait - elapsed)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poll_interval_is_2s() {
        assert_eq!(StatusPoller::default().interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_default_max_wait_is_120s() {
        assert_eq!(StatusPoller::default().max_wait(), Duration::from_secs(120));
    }

    #[test]
    fn test_custom_poller() {
        let poller = StatusPoller::new(Duration::from_millis(10), Duration::from_secs(1));
        assert_eq!(poller.interval(), Duration::from_millis(10));
        assert_eq!(poller.max_wait(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_interval_is_raised_to_minimum() {
        let poller = StatusPoller::new(Duration::ZERO, Duration::from_secs(1));
        assert_eq!(poller.interval(), MIN_POLL_INTERVAL);
    }
}
