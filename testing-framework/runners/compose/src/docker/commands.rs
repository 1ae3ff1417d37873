use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::{self, Stdio},
    time::Duration,
};

use tokio::{process::Command, time::timeout};
use tracing::debug;

use crate::docker::ComposeTool;

/// Errors running compose commands.
#[derive(Debug, thiserror::Error)]
pub enum ComposeCommandError {
    #[error("{command} exited with status {status}: {detail}", detail = stderr.trim())]
    Failed {
        command: String,
        status: process::ExitStatus,
        stderr: String,
    },
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Captured result of a successful compose invocation.
#[derive(Debug, Clone, Default)]
pub struct ComposeOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A single `<tool> compose -f <file> ...` invocation.
#[derive(Debug, Clone)]
pub struct ComposeInvocation {
    tool: ComposeTool,
    compose_file: PathBuf,
    project_name: Option<String>,
    working_dir: Option<PathBuf>,
    args: Vec<String>,
}

impl ComposeInvocation {
    pub fn new(tool: ComposeTool, compose_file: &Path) -> Self {
        Self {
            tool,
            compose_file: compose_file.to_path_buf(),
            project_name: None,
            working_dir: None,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn project_name(mut self, project_name: Option<&str>) -> Self {
        self.project_name = project_name.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn working_dir(mut self, working_dir: Option<&Path>) -> Self {
        self.working_dir = working_dir.map(Path::to_path_buf);
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable form used in errors and logs, e.g. `docker compose up`.
    pub fn description(&self) -> String {
        let subcommand = self.args.first().map(String::as_str).unwrap_or_default();
        format!("{} compose {subcommand}", self.tool.binary())
    }

    /// Full argument vector passed to the tool binary.
    ///
    /// The compose file path is passed through as-is, so non-UTF-8 paths
    /// reach the child unchanged.
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = vec![
            OsString::from("compose"),
            OsString::from("-f"),
            self.compose_file.clone().into_os_string(),
        ];
        if let Some(project) = &self.project_name {
            argv.push(OsString::from("-p"));
            argv.push(OsString::from(project));
        }
        argv.extend(self.args.iter().map(OsString::from));
        argv
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.tool.binary());
        cmd.args(self.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run the invocation, judging success solely by the exit code.
    pub async fn run(&self, timeout_duration: Duration) -> Result<ComposeOutput, ComposeCommandError> {
        let description = self.description();
        debug!(command = %description, args = ?self.argv(), "running compose command");

        let output = match timeout(timeout_duration, self.command().output()).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ComposeCommandError::Timeout {
                    command: description,
                    timeout: timeout_duration,
                });
            }
        };

        handle_compose_output(output, description)
    }
}

fn handle_compose_output(
    output: io::Result<process::Output>,
    description: String,
) -> Result<ComposeOutput, ComposeCommandError> {
    match output {
        Ok(out) if out.status.success() => Ok(ComposeOutput {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }),
        Ok(out) => Err(ComposeCommandError::Failed {
            command: description,
            status: out.status,
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }),
        Err(source) => Err(ComposeCommandError::Spawn {
            command: description,
            source,
        }),
    }
}
