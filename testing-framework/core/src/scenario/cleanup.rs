use tracing::debug;

/// Teardown hook handed back to test harnesses.
///
/// Cleanup consumes the guard and never fails: errors are reported through
/// logs so a flaky teardown cannot mask the outcome of the test it wraps.
pub trait CleanupGuard: Send {
    fn cleanup(self: Box<Self>);
}

/// Run every guard in reverse acquisition order.
pub fn run_cleanup(guards: Vec<Box<dyn CleanupGuard>>) {
    let total = guards.len();
    for (index, guard) in guards.into_iter().rev().enumerate() {
        debug!(guard = total - index, total, "running cleanup guard");
        guard.cleanup();
    }
}
