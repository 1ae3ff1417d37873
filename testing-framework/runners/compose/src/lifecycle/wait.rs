use std::{path::Path, time::Duration};

use testing_framework_core::constants::DEFAULT_HEALTH_ATTEMPTS;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{
    docker::runtime::ComposeRuntime,
    errors::ComposeRunnerError,
    health::{HealthCheckMode, HealthStatus, classify},
};

/// How long to keep polling before declaring a service unhealthy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthBudget {
    /// Number of status checks.
    Attempts(u32),
    /// Wall-clock budget, converted to `ceil(timeout / poll_interval)` checks.
    Timeout(Duration),
}

impl Default for HealthBudget {
    fn default() -> Self {
        Self::Attempts(DEFAULT_HEALTH_ATTEMPTS)
    }
}

impl HealthBudget {
    /// Number of status checks this budget allows; always at least one.
    #[must_use]
    pub fn attempts(self, poll_interval: Duration) -> u32 {
        let attempts = match self {
            Self::Attempts(attempts) => attempts,
            Self::Timeout(_) if poll_interval.is_zero() => 1,
            Self::Timeout(timeout) => {
                let interval = poll_interval.as_nanos();
                let checks = timeout.as_nanos().div_ceil(interval);
                u32::try_from(checks).unwrap_or(u32::MAX)
            }
        };
        attempts.max(1)
    }
}

impl From<u32> for HealthBudget {
    fn from(attempts: u32) -> Self {
        Self::Attempts(attempts)
    }
}

impl From<Duration> for HealthBudget {
    fn from(timeout: Duration) -> Self {
        Self::Timeout(timeout)
    }
}

/// Fixed-interval health polling against a compose runtime.
#[derive(Clone, Copy, Debug)]
pub struct HealthPoller {
    poll_interval: Duration,
    mode: HealthCheckMode,
}

impl HealthPoller {
    #[must_use]
    pub const fn new(poll_interval: Duration, mode: HealthCheckMode) -> Self {
        Self {
            poll_interval,
            mode,
        }
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Single status check. Failing to query status counts as unhealthy.
    pub async fn check<R>(&self, runtime: &R, compose_file: &Path) -> HealthStatus
    where
        R: ComposeRuntime + ?Sized,
    {
        match runtime.status(compose_file).await {
            Ok(raw) => classify(&raw, self.mode),
            Err(err) => {
                debug!(
                    compose_file = %compose_file.display(),
                    error = %err,
                    "status check failed; treating service as unhealthy"
                );
                HealthStatus::Unhealthy
            }
        }
    }

    /// Poll until healthy or the budget runs out. Returns the number of
    /// status checks issued.
    ///
    /// No sleep follows the final check. Dropping the returned future cancels
    /// the wait between checks.
    pub async fn wait<R>(
        &self,
        runtime: &R,
        compose_file: &Path,
        budget: HealthBudget,
    ) -> Result<u32, ComposeRunnerError>
    where
        R: ComposeRuntime + ?Sized,
    {
        if matches!(budget, HealthBudget::Timeout(_)) && self.poll_interval.is_zero() {
            warn!(
                ?budget,
                "zero poll interval turns a time budget into a single status check"
            );
        }
        let max_attempts = budget.attempts(self.poll_interval);
        let started = Instant::now();

        for attempt in 1..=max_attempts {
            if self.check(runtime, compose_file).await.is_healthy() {
                info!(
                    compose_file = %compose_file.display(),
                    attempt,
                    elapsed = ?started.elapsed(),
                    "compose service healthy"
                );
                return Ok(attempt);
            }

            if attempt < max_attempts {
                debug!(attempt, max_attempts, "compose service not healthy yet");
                sleep(self.poll_interval).await;
            }
        }

        Err(ComposeRunnerError::HealthTimeout {
            compose_file: compose_file.to_path_buf(),
            attempts: max_attempts,
            elapsed: started.elapsed(),
        })
    }
}
