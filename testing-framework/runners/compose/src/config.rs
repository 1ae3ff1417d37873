use std::{env, path::PathBuf, time::Duration};

use testing_framework_core::{
    adjust_timeout,
    constants::{DEFAULT_COMPOSE_COMMAND_TIMEOUT, DEFAULT_TOOL_PROBE_TIMEOUT, health_poll_interval},
};

use crate::{docker::ComposeTool, errors::ComposeRunnerError, health::HealthCheckMode};

/// Knobs shared by the compose runner and its cleanup guards.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    pub tool: Option<ComposeTool>,
    pub project_name: Option<String>,
    /// Directory compose commands run in; `None` keeps the process cwd.
    pub working_dir: Option<PathBuf>,
    pub poll_interval: Duration,
    pub command_timeout: Duration,
    pub probe_timeout: Duration,
    pub health_mode: HealthCheckMode,
    pub remove_volumes: bool,
    pub preserve: bool,
    pub dump_logs_on_failure: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tool: None,
            project_name: None,
            working_dir: None,
            poll_interval: health_poll_interval(),
            command_timeout: adjust_timeout(DEFAULT_COMPOSE_COMMAND_TIMEOUT),
            probe_timeout: adjust_timeout(DEFAULT_TOOL_PROBE_TIMEOUT),
            health_mode: HealthCheckMode::default(),
            remove_volumes: false,
            preserve: false,
            dump_logs_on_failure: true,
        }
    }
}

impl RunnerConfig {
    /// Build a config from `COMPOSE_RUNNER_*` environment variables.
    pub fn from_env() -> Result<Self, ComposeRunnerError> {
        let tool = non_empty_var("COMPOSE_RUNNER_TOOL")
            .map(|value| value.parse::<ComposeTool>())
            .transpose()?;
        let health_mode = non_empty_var("COMPOSE_RUNNER_HEALTH_MODE")
            .map(|value| value.parse::<HealthCheckMode>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            tool,
            project_name: non_empty_var("COMPOSE_RUNNER_PROJECT"),
            health_mode,
            preserve: preserve_requested(),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_tool(mut self, tool: ComposeTool) -> Self {
        self.tool = Some(tool);
        self
    }

    #[must_use]
    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub const fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    #[must_use]
    pub const fn with_health_mode(mut self, health_mode: HealthCheckMode) -> Self {
        self.health_mode = health_mode;
        self
    }

    #[must_use]
    pub const fn with_remove_volumes(mut self, remove_volumes: bool) -> Self {
        self.remove_volumes = remove_volumes;
        self
    }

    #[must_use]
    pub const fn with_preserve(mut self, preserve: bool) -> Self {
        self.preserve = preserve;
        self
    }

    #[must_use]
    pub const fn with_log_dump(mut self, dump_logs_on_failure: bool) -> Self {
        self.dump_logs_on_failure = dump_logs_on_failure;
        self
    }
}

fn preserve_requested() -> bool {
    env::var("COMPOSE_RUNNER_PRESERVE").is_ok()
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
