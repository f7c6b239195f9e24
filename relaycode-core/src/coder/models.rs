use relaycode_config::AgentConfig;

/// The model a coder drives, with its editor sub-model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub name: String,
    /// Model used for applying edits. `None` means the main model does both.
    pub editor_model: Option<String>,
    pub editor_edit_format: String,
}

impl ModelSettings {
    pub fn new(name: impl Into<String>, editor_edit_format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            editor_model: None,
            editor_edit_format: editor_edit_format.into(),
        }
    }

    pub fn with_editor_model(mut self, editor_model: impl Into<String>) -> Self {
        self.editor_model = Some(editor_model.into());
        self
    }

    pub fn from_agent_config(config: &AgentConfig) -> Self {
        Self {
            name: config.model.clone(),
            editor_model: config
                .editor_model
                .as_deref()
                .map(str::trim)
                .filter(|model| !model.is_empty())
                .map(ToOwned::to_owned),
            editor_edit_format: config.editor_edit_format.clone(),
        }
    }

    /// Editor sub-model, falling back to the main model.
    pub fn editor_model_name(&self) -> &str {
        self.editor_model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(&self.name)
    }
}
