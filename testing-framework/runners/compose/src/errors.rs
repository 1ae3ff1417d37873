use std::{path::PathBuf, time::Duration};

use crate::docker::commands::ComposeCommandError;

#[derive(Debug, thiserror::Error)]
/// Top-level compose runner errors.
pub enum ComposeRunnerError {
    #[error("neither `docker compose` nor `podman compose` is available on this host")]
    ToolUnavailable,
    #[error("`{tool} compose` is not available on this host (pinned via COMPOSE_RUNNER_TOOL)")]
    PinnedToolUnavailable { tool: &'static str },
    #[error("unsupported compose tool '{value}'; expected `docker` or `podman`")]
    InvalidTool { value: String },
    #[error("unsupported health check mode '{value}'; expected `structured` or `substring`")]
    InvalidHealthMode { value: String },
    #[error(transparent)]
    Compose(#[from] ComposeCommandError),
    #[error(
        "service in {file} did not become healthy after {attempts} attempt(s) ({elapsed:?})",
        file = compose_file.display()
    )]
    HealthTimeout {
        compose_file: PathBuf,
        attempts: u32,
        elapsed: Duration,
    },
}
