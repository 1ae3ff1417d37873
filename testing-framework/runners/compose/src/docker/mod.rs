pub mod commands;
pub mod runtime;

use std::{fmt, future::Future, process::Stdio, str::FromStr, time::Duration};

use tokio::{process::Command, time::timeout};
use tracing::{debug, info};

use crate::errors::ComposeRunnerError;

/// Container tool providing the `compose` subcommand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeTool {
    Docker,
    Podman,
}

impl ComposeTool {
    /// Detection order when nothing is pinned.
    pub const CANDIDATES: [Self; 2] = [Self::Docker, Self::Podman];

    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Podman => "podman",
        }
    }
}

impl fmt::Display for ComposeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for ComposeTool {
    type Err = ComposeRunnerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "podman" => Ok(Self::Podman),
            _ => Err(ComposeRunnerError::InvalidTool {
                value: value.to_owned(),
            }),
        }
    }
}

/// Checks that `<tool> compose version` succeeds within a timeout.
pub async fn compose_tool_available(tool: ComposeTool, probe_timeout: Duration) -> bool {
    let mut command = Command::new(tool.binary());
    command
        .arg("compose")
        .arg("version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let available = timeout(probe_timeout, command.status())
        .await
        .ok()
        .and_then(Result::ok)
        .map(|status| status.success())
        .unwrap_or(false);

    debug!(tool = %tool, available, "probed compose tool");
    available
}

/// Find a usable compose tool, preferring docker over podman.
pub async fn detect_compose_tool(
    pinned: Option<ComposeTool>,
    probe_timeout: Duration,
) -> Result<ComposeTool, ComposeRunnerError> {
    select_tool(pinned, |tool| compose_tool_available(tool, probe_timeout)).await
}

async fn select_tool<F, Fut>(
    pinned: Option<ComposeTool>,
    mut probe: F,
) -> Result<ComposeTool, ComposeRunnerError>
where
    F: FnMut(ComposeTool) -> Fut,
    Fut: Future<Output = bool>,
{
    if let Some(tool) = pinned {
        return if probe(tool).await {
            info!(tool = %tool, "using pinned compose tool");
            Ok(tool)
        } else {
            Err(ComposeRunnerError::PinnedToolUnavailable {
                tool: tool.binary(),
            })
        };
    }

    for tool in ComposeTool::CANDIDATES {
        if probe(tool).await {
            info!(tool = %tool, "detected compose tool");
            return Ok(tool);
        }
    }

    Err(ComposeRunnerError::ToolUnavailable)
}
