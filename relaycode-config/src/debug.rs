//! Debug and tracing configuration

use serde::{Deserialize, Serialize};

use crate::constants::defaults;

/// Trace level for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl TraceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown levels fall back to the default instead of failing the whole file.
impl<'de> Deserialize<'de> for TraceLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

/// Debug and tracing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DebugConfig {
    /// Enable structured logging for development and troubleshooting
    #[serde(default)]
    pub enable_tracing: bool,

    /// Trace level (error, warn, info, debug, trace)
    #[serde(default)]
    pub trace_level: TraceLevel,

    /// List of tracing targets to enable
    /// Examples: "relaycode.coder", "relaycode.cmd_runner"
    #[serde(default)]
    pub trace_targets: Vec<String>,
}

impl DebugConfig {
    /// `EnvFilter` directive string built from the configured targets and level.
    pub fn filter_directive(&self) -> String {
        let targets: Vec<&str> = if self.trace_targets.is_empty() {
            defaults::TRACE_TARGETS.split(',').collect()
        } else {
            self.trace_targets.iter().map(String::as_str).collect()
        };

        targets
            .iter()
            .map(|target| format!("{}={}", target.trim(), self.trace_level.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}
