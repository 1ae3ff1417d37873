use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    config::RunnerConfig,
    docker::{
        ComposeTool,
        commands::{ComposeCommandError, ComposeInvocation},
    },
};

/// Process-level compose operations.
///
/// Implementations only report what the tool did; deciding whether a
/// failure matters is left to the runner.
#[async_trait]
pub trait ComposeRuntime: Send + Sync + 'static {
    /// Bring the services up detached.
    async fn up(&self, compose_file: &Path) -> Result<(), ComposeCommandError>;

    /// Tear the services down.
    async fn down(&self, compose_file: &Path) -> Result<(), ComposeCommandError>;

    /// Raw `ps --format json` output.
    async fn status(&self, compose_file: &Path) -> Result<String, ComposeCommandError>;

    /// Combined service logs, for diagnostics.
    async fn logs(&self, compose_file: &Path) -> Result<String, ComposeCommandError>;
}

/// Runs compose through the `docker`/`podman` command line.
#[derive(Clone, Debug)]
pub struct CliCompose {
    tool: ComposeTool,
    project_name: Option<String>,
    working_dir: Option<PathBuf>,
    command_timeout: Duration,
    remove_volumes: bool,
}

impl CliCompose {
    pub fn new(tool: ComposeTool, config: &RunnerConfig) -> Self {
        Self {
            tool,
            project_name: config.project_name.clone(),
            working_dir: config.working_dir.clone(),
            command_timeout: config.command_timeout,
            remove_volumes: config.remove_volumes,
        }
    }

    #[must_use]
    pub const fn tool(&self) -> ComposeTool {
        self.tool
    }

    fn invocation<I, S>(&self, compose_file: &Path, args: I) -> ComposeInvocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ComposeInvocation::new(self.tool, compose_file)
            .project_name(self.project_name.as_deref())
            .working_dir(self.working_dir.as_deref())
            .args(args)
    }

    fn down_args(&self) -> Vec<&'static str> {
        if self.remove_volumes {
            vec!["down", "--volumes"]
        } else {
            vec!["down"]
        }
    }
}

#[async_trait]
impl ComposeRuntime for CliCompose {
    async fn up(&self, compose_file: &Path) -> Result<(), ComposeCommandError> {
        self.invocation(compose_file, ["up", "-d"])
            .run(self.command_timeout)
            .await
            .map(drop)
    }

    async fn down(&self, compose_file: &Path) -> Result<(), ComposeCommandError> {
        self.invocation(compose_file, self.down_args())
            .run(self.command_timeout)
            .await
            .map(drop)
    }

    async fn status(&self, compose_file: &Path) -> Result<String, ComposeCommandError> {
        self.invocation(compose_file, ["ps", "--format", "json"])
            .run(self.command_timeout)
            .await
            .map(|output| output.stdout)
    }

    async fn logs(&self, compose_file: &Path) -> Result<String, ComposeCommandError> {
        let output = self
            .invocation(compose_file, ["logs", "--no-color"])
            .run(self.command_timeout)
            .await?;

        let mut logs = output.stdout;
        if !output.stderr.is_empty() {
            logs.push_str(&output.stderr);
        }
        Ok(logs)
    }
}
