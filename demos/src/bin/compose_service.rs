use std::{env, path::PathBuf, time::Duration};

use anyhow::Context as _;
use testing_framework_runner_compose::{ComposeRunner, HealthBudget};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_COMPOSE_FILE: &str = "compose.yml";
const DEFAULT_ATTEMPTS: u32 = 60;
const DEFAULT_HOLD_SECS: u64 = 10;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let compose_file = env::args()
        .nth(1)
        .or_else(|| env::var("COMPOSE_DEMO_FILE").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPOSE_FILE));
    let attempts = read_env("COMPOSE_DEMO_ATTEMPTS", DEFAULT_ATTEMPTS);
    let hold_secs = read_env("COMPOSE_DEMO_HOLD_SECS", DEFAULT_HOLD_SECS);
    info!(
        compose_file = %compose_file.display(),
        attempts, hold_secs, "starting compose service demo"
    );

    if let Err(err) = run(compose_file, attempts, Duration::from_secs(hold_secs)).await {
        warn!("compose service demo failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run(compose_file: PathBuf, attempts: u32, hold: Duration) -> anyhow::Result<()> {
    let runner = ComposeRunner::detect()
        .await
        .context("detecting compose tool")?;
    info!(tool = %runner.tool(), "compose tool ready");

    let service = runner
        .start_guarded(&compose_file, HealthBudget::Attempts(attempts))
        .await
        .with_context(|| format!("starting {}", compose_file.display()))?;

    info!(?hold, "service healthy; press ctrl-c to stop early");
    tokio::select! {
        () = tokio::time::sleep(hold) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("waiting for ctrl-c")?;
            info!("interrupted");
        }
    }

    service.stop().await;
    Ok(())
}

fn read_env<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(default)
}
