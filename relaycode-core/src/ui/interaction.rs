use anyhow::Result;
use async_trait::async_trait;

/// Answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResponse {
    Yes,
    No,
    /// Accept, but revise the text in an editor first.
    Tweak,
}

/// The channel a coder uses to talk to its user.
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Ask a yes/no question. [`ConfirmResponse::Tweak`] is only offered when
    /// `allow_tweak` is set.
    async fn confirm_ask(&self, prompt: &str, allow_tweak: bool) -> Result<ConfirmResponse>;

    /// Let the user revise `text` in an external editor and return the result.
    async fn edit_in_editor(&self, text: &str) -> Result<String>;

    fn tool_error(&self, message: &str);

    fn tool_output(&self, message: &str);
}
