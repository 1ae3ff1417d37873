pub mod constants;
pub mod scenario;

use std::{env, time::Duration};

use constants::SLOW_ENV_TIMEOUT_MULTIPLIER;

/// Returns true when the process runs on a slow CI host (`SLOW_TEST_ENV=true`).
pub fn is_slow_test_env() -> bool {
    env::var("SLOW_TEST_ENV").is_ok_and(|value| value == "true" || value == "1")
}

/// Scale a timeout for slow environments.
#[must_use]
pub fn adjust_timeout(timeout: Duration) -> Duration {
    if is_slow_test_env() {
        timeout.saturating_mul(SLOW_ENV_TIMEOUT_MULTIPLIER)
    } else {
        timeout
    }
}
