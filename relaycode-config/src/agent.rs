use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::constants::defaults;

/// Model selection and hand-off behaviour for the delegated-edit coder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentConfig {
    /// Main model used by the primary coder
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used by the secondary coder that applies the crew's output.
    /// Falls back to `model` when unset.
    #[serde(default)]
    pub editor_model: Option<String>,

    /// Edit format handed to the secondary coder
    #[serde(default = "default_editor_edit_format")]
    pub editor_edit_format: String,

    /// Edit format the host switches back to after a hand-off
    #[serde(default = "default_return_edit_format")]
    pub return_edit_format: String,

    /// Proceed with the hand-off even when the confirmation is declined
    #[serde(default)]
    pub auto_accept_delegation: bool,

    /// Offer a "tweak" answer that opens the request in an editor first
    #[serde(default)]
    pub tweak_responses: bool,

    #[serde(default)]
    pub verbose: bool,
}

fn default_model() -> String {
    defaults::MODEL.to_string()
}

fn default_editor_edit_format() -> String {
    defaults::EDITOR_EDIT_FORMAT.to_string()
}

fn default_return_edit_format() -> String {
    defaults::RETURN_EDIT_FORMAT.to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            editor_model: None,
            editor_edit_format: default_editor_edit_format(),
            return_edit_format: default_return_edit_format(),
            auto_accept_delegation: false,
            tweak_responses: false,
            verbose: false,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            bail!("agent.model must not be empty");
        }
        if self.editor_edit_format.trim().is_empty() {
            bail!("agent.editor_edit_format must not be empty");
        }
        if self.return_edit_format.trim().is_empty() {
            bail!("agent.return_edit_format must not be empty");
        }
        Ok(())
    }
}
