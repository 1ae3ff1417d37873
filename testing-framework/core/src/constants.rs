use std::{env, time::Duration};

/// Fixed interval between health probes of a compose stack.
pub const DEFAULT_HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of health probes before giving up on a service.
pub const DEFAULT_HEALTH_ATTEMPTS: u32 = 60;

/// Upper bound for a single `compose up`/`down`/`ps` invocation.
pub const DEFAULT_COMPOSE_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound for `<tool> compose version` while detecting the tool.
pub const DEFAULT_TOOL_PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Multiplier applied to timeouts when `SLOW_TEST_ENV` is set.
pub const SLOW_ENV_TIMEOUT_MULTIPLIER: u32 = 2;

/// Resolve the health poll interval from `COMPOSE_RUNNER_POLL_INTERVAL_MS`,
/// falling back to the default. Zero is rejected: time budgets are divided by
/// the interval.
pub fn health_poll_interval() -> Duration {
    env::var("COMPOSE_RUNNER_POLL_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_HEALTH_POLL_INTERVAL)
}
