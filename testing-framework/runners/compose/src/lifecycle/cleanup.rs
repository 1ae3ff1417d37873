use std::{
    path::{Path, PathBuf},
    thread,
};

use testing_framework_core::scenario::CleanupGuard;
use tracing::warn;

use crate::{docker::runtime::ComposeRuntime, runner::ComposeRunner};

/// Keeps a started compose service alive until it is stopped or dropped.
///
/// Dropping an un-stopped guard tears the service down on a helper thread,
/// so cleanup still happens when a test panics.
pub struct ServiceGuard<R: ComposeRuntime> {
    runner: ComposeRunner<R>,
    compose_file: PathBuf,
    stopped: bool,
}

impl<R: ComposeRuntime> ServiceGuard<R> {
    pub(crate) fn new(runner: ComposeRunner<R>, compose_file: PathBuf) -> Self {
        debug_assert!(
            !compose_file.as_os_str().is_empty(),
            "service guard should receive a compose file"
        );
        Self {
            runner,
            compose_file,
            stopped: false,
        }
    }

    #[must_use]
    pub fn compose_file(&self) -> &Path {
        &self.compose_file
    }

    #[must_use]
    pub fn runner(&self) -> &ComposeRunner<R> {
        &self.runner
    }

    /// Stop the service from async context.
    pub async fn stop(mut self) {
        self.stopped = true;
        self.runner.stop_service(&self.compose_file).await;
    }

    fn teardown_blocking(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        let runner = self.runner.clone();
        let compose_file = self.compose_file.clone();
        let handle = thread::spawn(move || {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime.block_on(runner.stop_service(&compose_file)),
                Err(err) => warn!(
                    compose_file = %compose_file.display(),
                    error = %err,
                    "failed to build runtime for compose teardown"
                ),
            }
        });

        if handle.join().is_err() {
            warn!(
                compose_file = %self.compose_file.display(),
                "compose teardown thread panicked"
            );
        }
    }
}

impl<R: ComposeRuntime> Drop for ServiceGuard<R> {
    fn drop(&mut self) {
        self.teardown_blocking();
    }
}

impl<R: ComposeRuntime> CleanupGuard for ServiceGuard<R> {
    fn cleanup(mut self: Box<Self>) {
        self.teardown_blocking();
    }
}
