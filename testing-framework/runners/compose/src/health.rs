//! Classification of `compose ps --format json` output.
//!
//! Compose releases disagree on the shape of this output: some print a JSON
//! array, others one object per line, and podman's wrapper prints whatever
//! the underlying provider emits. The classifier parses whatever JSON it can
//! find and falls back to a raw substring scan when the text is not JSON at
//! all.
//!
//! The substring scan is knowingly imprecise: a service name or label that
//! happens to contain `(healthy)` is enough for a false positive. Callers who
//! depend on that exact behaviour can opt into [`HealthCheckMode::Substring`].

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::ComposeRunnerError;

/// Markers recognised by the substring scan.
pub const HEALTHY_MARKERS: [&str; 3] = [r#""Health":"healthy""#, r#""Health": "healthy""#, "(healthy)"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// How status output is turned into a [`HealthStatus`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HealthCheckMode {
    /// Parse JSON service entries, scanning raw text only when parsing fails.
    ///
    /// Unlike the substring scan, a `(healthy)` marker outside the `Health`
    /// and `Status` fields of well-formed JSON (a service name, a label) does
    /// not count as healthy.
    #[default]
    Structured,
    /// Scan raw text for the healthy markers, ignoring structure.
    Substring,
}

impl FromStr for HealthCheckMode {
    type Err = ComposeRunnerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(Self::Structured),
            "substring" | "raw" => Ok(Self::Substring),
            _ => Err(ComposeRunnerError::InvalidHealthMode {
                value: value.to_owned(),
            }),
        }
    }
}

/// One service entry from `compose ps --format json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServiceState {
    pub name: Option<String>,
    pub service: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub health: Option<String>,
}

impl ServiceState {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.health.as_deref() == Some("healthy")
            || self
                .status
                .as_deref()
                .is_some_and(|status| status.contains("(healthy)"))
    }
}

/// Classify raw status output.
#[must_use]
pub fn classify(raw: &str, mode: HealthCheckMode) -> HealthStatus {
    let healthy = match mode {
        HealthCheckMode::Substring => contains_healthy_marker(raw),
        HealthCheckMode::Structured => parse_services(raw).map_or_else(
            || contains_healthy_marker(raw),
            |services| services.iter().any(ServiceState::is_healthy),
        ),
    };

    if healthy {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    }
}

/// Parse every service entry in the output, accepting a JSON array, a single
/// object or newline-delimited objects. Returns `None` when the text is not
/// JSON of that shape.
#[must_use]
pub fn parse_services(raw: &str) -> Option<Vec<ServiceState>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Vec::new());
    }

    let mut services = Vec::new();
    for value in serde_json::Deserializer::from_str(trimmed).into_iter::<Value>() {
        match value.ok()? {
            Value::Array(entries) => {
                for entry in entries {
                    services.push(service_from_value(entry)?);
                }
            }
            entry @ Value::Object(_) => services.push(service_from_value(entry)?),
            _ => return None,
        }
    }

    Some(services)
}

fn service_from_value(value: Value) -> Option<ServiceState> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn contains_healthy_marker(raw: &str) -> bool {
    HEALTHY_MARKERS.iter().any(|marker| raw.contains(marker))
}
