//! Start a compose-defined dependency, wait for it to report healthy, and
//! guarantee it is torn down again.
//!
//! ```no_run
//! use testing_framework_runner_compose::{ComposeRunner, HealthBudget};
//!
//! # async fn run() -> Result<(), testing_framework_runner_compose::ComposeRunnerError> {
//! let runner = ComposeRunner::detect().await?;
//! let service = runner
//!     .start_guarded("tests/compose/postgres.yml", HealthBudget::Attempts(30))
//!     .await?;
//!
//! // ... run tests against the service ...
//!
//! service.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod docker;
pub mod errors;
pub mod health;
pub mod lifecycle;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::RunnerConfig;
pub use docker::{
    ComposeTool, compose_tool_available, detect_compose_tool,
    commands::{ComposeCommandError, ComposeInvocation, ComposeOutput},
    runtime::{CliCompose, ComposeRuntime},
};
pub use errors::ComposeRunnerError;
pub use health::{HealthCheckMode, HealthStatus, ServiceState, classify, parse_services};
pub use lifecycle::{
    cleanup::ServiceGuard,
    wait::{HealthBudget, HealthPoller},
};
pub use runner::ComposeRunner;
