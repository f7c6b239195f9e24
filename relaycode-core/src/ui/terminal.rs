use std::io::IsTerminal;

use anyhow::{Context, Result};
use async_trait::async_trait;
use crossterm::style::Stylize;
use dialoguer::Select;
use tracing::{debug, warn};

use super::editor::EditorLauncher;
use super::interaction::{ConfirmResponse, UserInteraction};

/// [`UserInteraction`] on the controlling terminal.
///
/// Prompts use dialoguer and run on the blocking pool. Without an
/// interactive stdin every confirmation is answered with
/// [`ConfirmResponse::No`].
#[derive(Debug, Clone, Default)]
pub struct TerminalInteraction {
    editor: EditorLauncher,
}

impl TerminalInteraction {
    pub fn new(preferred_editor: Option<String>) -> Self {
        Self {
            editor: EditorLauncher::new(preferred_editor),
        }
    }
}

fn confirmation_options(allow_tweak: bool) -> Vec<&'static str> {
    let mut options = vec!["Yes", "No"];
    if allow_tweak {
        options.push("Tweak - edit the request first");
    }
    options
}

fn response_for_selection(selection: usize) -> ConfirmResponse {
    match selection {
        0 => ConfirmResponse::Yes,
        2 => ConfirmResponse::Tweak,
        _ => ConfirmResponse::No,
    }
}

#[async_trait]
impl UserInteraction for TerminalInteraction {
    async fn confirm_ask(&self, prompt: &str, allow_tweak: bool) -> Result<ConfirmResponse> {
        if !std::io::stdin().is_terminal() {
            debug!(target: "relaycode.ui", prompt, "stdin is not a terminal, declining");
            return Ok(ConfirmResponse::No);
        }

        let prompt = prompt.to_string();
        let selection = tokio::task::spawn_blocking(move || {
            let options = confirmation_options(allow_tweak);
            Select::new()
                .with_prompt(prompt)
                .default(0)
                .items(&options)
                .interact()
        })
        .await
        .context("confirmation prompt task failed")??;

        Ok(response_for_selection(selection))
    }

    async fn edit_in_editor(&self, text: &str) -> Result<String> {
        let editor = self.editor.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || editor.edit_text(&text))
            .await
            .context("editor task failed")?
    }

    fn tool_error(&self, message: &str) {
        warn!(target: "relaycode.ui", message, "tool error");
        eprintln!("{}", message.red());
    }

    fn tool_output(&self, message: &str) {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweak_option_only_when_allowed() {
        assert_eq!(confirmation_options(false), vec!["Yes", "No"]);
        assert_eq!(confirmation_options(true).len(), 3);
    }

    #[test]
    fn selection_maps_to_response() {
        assert_eq!(response_for_selection(0), ConfirmResponse::Yes);
        assert_eq!(response_for_selection(1), ConfirmResponse::No);
        assert_eq!(response_for_selection(2), ConfirmResponse::Tweak);
    }
}
