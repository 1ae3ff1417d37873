use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use tempfile::TempDir;

/// Busybox service whose health check flips to healthy after a marker file
/// appears, so tests can observe the starting -> healthy transition.
pub const HEALTHCHECK_COMPOSE: &str = r#"services:
  probe:
    image: busybox:1.36
    command: ["sh", "-c", "sleep 2 && touch /tmp/ready && sleep 3600"]
    healthcheck:
      test: ["CMD", "test", "-f", "/tmp/ready"]
      interval: 1s
      timeout: 1s
      retries: 30
"#;

/// Busybox service without a health check; never reports healthy.
pub const NO_HEALTHCHECK_COMPOSE: &str = r#"services:
  idle:
    image: busybox:1.36
    command: ["sleep", "3600"]
"#;

/// Compose file written into a scratch directory.
#[derive(Debug)]
pub struct ComposeFixture {
    dir: TempDir,
    file: PathBuf,
}

impl ComposeFixture {
    pub fn write(contents: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("compose-runner-")
            .tempdir()
            .context("creating compose fixture dir")?;
        let file = dir.path().join("compose.yml");
        fs::write(&file, contents)
            .with_context(|| format!("writing compose fixture {}", file.display()))?;
        Ok(Self { dir, file })
    }

    #[must_use]
    pub fn compose_file(&self) -> &Path {
        &self.file
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Project name derived from the scratch dir, unique per fixture.
    #[must_use]
    pub fn project_name(&self) -> String {
        self.dir
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_else(|| String::from("compose-runner"))
            .replace(|c: char| !c.is_ascii_alphanumeric() && c != '-', "-")
    }
}
