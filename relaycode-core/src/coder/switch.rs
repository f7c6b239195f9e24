use super::models::ModelSettings;

/// Request to leave the current coder and continue in another edit format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCoder {
    pub main_model: ModelSettings,
    pub edit_format: String,
}

impl SwitchCoder {
    pub fn new(main_model: ModelSettings, edit_format: impl Into<String>) -> Self {
        Self {
            main_model,
            edit_format: edit_format.into(),
        }
    }
}

/// What the host loop should do after a reply has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Stay in the current coder.
    Continue,
    /// Replace the current coder.
    Switch(SwitchCoder),
}
