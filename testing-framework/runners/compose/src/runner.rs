use std::{path::Path, sync::Arc};

use tracing::{info, warn};

use crate::{
    config::RunnerConfig,
    docker::{
        ComposeTool, detect_compose_tool,
        runtime::{CliCompose, ComposeRuntime},
    },
    errors::ComposeRunnerError,
    lifecycle::{
        cleanup::ServiceGuard,
        wait::{HealthBudget, HealthPoller},
    },
};

/// Start/stop bracket around a compose-defined test dependency.
pub struct ComposeRunner<R: ComposeRuntime = CliCompose> {
    runtime: Arc<R>,
    config: RunnerConfig,
    poller: HealthPoller,
}

impl<R: ComposeRuntime> Clone for ComposeRunner<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            config: self.config.clone(),
            poller: self.poller,
        }
    }
}

impl ComposeRunner<CliCompose> {
    /// Detect `docker compose` or `podman compose` using env configuration.
    ///
    /// Fails with [`ComposeRunnerError::ToolUnavailable`] before any compose
    /// command runs when neither tool works.
    pub async fn detect() -> Result<Self, ComposeRunnerError> {
        Self::detect_with(RunnerConfig::from_env()?).await
    }

    pub async fn detect_with(config: RunnerConfig) -> Result<Self, ComposeRunnerError> {
        let tool = detect_compose_tool(config.tool, config.probe_timeout).await?;
        let runtime = CliCompose::new(tool, &config);
        Ok(Self::with_runtime(runtime, config))
    }

    #[must_use]
    pub fn tool(&self) -> ComposeTool {
        self.runtime.tool()
    }
}

impl<R: ComposeRuntime> ComposeRunner<R> {
    pub fn with_runtime(runtime: R, config: RunnerConfig) -> Self {
        let poller = HealthPoller::new(config.poll_interval, config.health_mode);
        Self {
            runtime: Arc::new(runtime),
            config,
            poller,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    #[must_use]
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Bring services up detached.
    pub async fn up(&self, compose_file: impl AsRef<Path>) -> Result<(), ComposeRunnerError> {
        let compose_file = compose_file.as_ref();
        info!(compose_file = %compose_file.display(), "starting compose services");
        self.runtime.up(compose_file).await.map_err(Into::into)
    }

    /// Tear services down, reporting failures to the caller.
    pub async fn down(&self, compose_file: impl AsRef<Path>) -> Result<(), ComposeRunnerError> {
        let compose_file = compose_file.as_ref();
        info!(compose_file = %compose_file.display(), "stopping compose services");
        self.runtime.down(compose_file).await.map_err(Into::into)
    }

    /// Single health check; status failures read as unhealthy.
    pub async fn is_healthy(&self, compose_file: impl AsRef<Path>) -> bool {
        self.poller
            .check(self.runtime.as_ref(), compose_file.as_ref())
            .await
            .is_healthy()
    }

    /// Poll until healthy, returning the number of status checks issued.
    pub async fn wait_until_healthy(
        &self,
        compose_file: impl AsRef<Path>,
        budget: impl Into<HealthBudget>,
    ) -> Result<u32, ComposeRunnerError> {
        self.poller
            .wait(self.runtime.as_ref(), compose_file.as_ref(), budget.into())
            .await
    }

    /// `up`, then wait for a healthy report. The first failure is returned.
    pub async fn start_service(
        &self,
        compose_file: impl AsRef<Path>,
        budget: impl Into<HealthBudget>,
    ) -> Result<(), ComposeRunnerError> {
        let compose_file = compose_file.as_ref();
        self.up(compose_file).await?;

        match self.wait_until_healthy(compose_file, budget).await {
            Ok(_) => Ok(()),
            Err(err) => {
                if self.config.dump_logs_on_failure {
                    self.dump_logs(compose_file).await;
                }
                Err(err)
            }
        }
    }

    /// `down`, never failing. Errors are logged so a flaky teardown cannot
    /// hide the result of the tests it follows.
    pub async fn stop_service(&self, compose_file: impl AsRef<Path>) {
        let compose_file = compose_file.as_ref();
        if self.config.preserve {
            info!(
                compose_file = %compose_file.display(),
                "compose preserve flag set; skipping compose down"
            );
            return;
        }

        if let Err(err) = self.down(compose_file).await {
            warn!(
                compose_file = %compose_file.display(),
                error = %err,
                "compose down failed; continuing"
            );
        }
    }

    /// Start the service and hand back a guard that stops it again.
    ///
    /// When startup fails the service is stopped before the error is
    /// returned, so partially started containers do not leak.
    pub async fn start_guarded(
        &self,
        compose_file: impl AsRef<Path>,
        budget: impl Into<HealthBudget>,
    ) -> Result<ServiceGuard<R>, ComposeRunnerError> {
        let guard = ServiceGuard::new(self.clone(), compose_file.as_ref().to_path_buf());

        match self.start_service(guard.compose_file(), budget).await {
            Ok(()) => Ok(guard),
            Err(err) => {
                guard.stop().await;
                Err(err)
            }
        }
    }

    async fn dump_logs(&self, compose_file: &Path) {
        match self.runtime.logs(compose_file).await {
            Ok(logs) if logs.trim().is_empty() => {}
            Ok(logs) => warn!(
                compose_file = %compose_file.display(),
                "compose service unhealthy; logs:\n{logs}"
            ),
            Err(err) => warn!(
                compose_file = %compose_file.display(),
                error = %err,
                "failed to collect compose logs"
            ),
        }
    }
}
