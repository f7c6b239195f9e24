use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;
use crate::crew::CrewConfig;
use crate::debug::DebugConfig;
use crate::editor::EditorConfig;

/// Main configuration structure for relaycode
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Model selection and hand-off behaviour
    #[serde(default)]
    pub agent: AgentConfig,

    /// Crew identity
    #[serde(default)]
    pub crew: CrewConfig,

    /// External editor settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Debug and tracing settings
    #[serde(default)]
    pub debug: DebugConfig,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        self.agent
            .validate()
            .context("Invalid [agent] configuration")?;
        self.crew.validate().context("Invalid [crew] configuration")?;
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
