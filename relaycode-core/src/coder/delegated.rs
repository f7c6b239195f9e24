use std::sync::Arc;

use anyhow::Result;
use relaycode_config::RelayConfig;
use tracing::{debug, info, warn};

use super::crew::{CrewIdentity, CrewProvider};
use super::factory::{CoderArgs, CoderConfig, CoderFactory, CoderLineage};
use super::messages::ChatMessage;
use super::models::ModelSettings;
use super::switch::{ReplyOutcome, SwitchCoder};
use crate::ui::{ConfirmResponse, UserInteraction};

/// Edit format name of the delegated coder.
pub const DELEGATED_EDIT_FORMAT: &str = "crew";

pub const CONFIRM_PROMPT: &str = "Edit the files using the crew?";

/// User-side note recorded once the crew's edits have been applied.
pub const APPLIED_NOTE: &str = "I made those changes to the files via the crew.";

/// Assistant reply paired with [`APPLIED_NOTE`].
pub const ASSISTANT_ACK: &str = "Ok.";

/// Static settings of a [`DelegatedEditCoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationSettings {
    pub main_model: ModelSettings,
    pub args: CoderArgs,
    /// Proceed even when the user answers "no".
    pub auto_accept: bool,
    /// Edit format to switch to once delegation is done.
    pub return_edit_format: String,
    pub crew_identity: CrewIdentity,
}

impl DelegationSettings {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            main_model: ModelSettings::from_agent_config(&config.agent),
            args: CoderArgs {
                tweak_responses: config.agent.tweak_responses,
                verbose: config.agent.verbose,
            },
            auto_accept: config.agent.auto_accept_delegation,
            return_edit_format: config.agent.return_edit_format.clone(),
            crew_identity: CrewIdentity::from(&config.crew),
        }
    }
}

/// Coder that sends the finished response to a crew instead of applying it
/// itself, then feeds the crew's answer to a freshly built editor coder.
pub struct DelegatedEditCoder {
    settings: DelegationSettings,
    io: Arc<dyn UserInteraction>,
    crew: Arc<dyn CrewProvider>,
    factory: Arc<dyn CoderFactory>,
    partial_response_content: String,
    cur_messages: Vec<ChatMessage>,
    done_messages: Vec<ChatMessage>,
    total_cost: f64,
    commit_hashes: Vec<String>,
}

impl DelegatedEditCoder {
    pub fn new(
        settings: DelegationSettings,
        io: Arc<dyn UserInteraction>,
        crew: Arc<dyn CrewProvider>,
        factory: Arc<dyn CoderFactory>,
    ) -> Self {
        Self {
            settings,
            io,
            crew,
            factory,
            partial_response_content: String::new(),
            cur_messages: Vec::new(),
            done_messages: Vec::new(),
            total_cost: 0.0,
            commit_hashes: Vec::new(),
        }
    }

    pub fn set_partial_response(&mut self, content: impl Into<String>) {
        self.partial_response_content = content.into();
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.cur_messages.push(message);
    }

    pub fn cur_messages(&self) -> &[ChatMessage] {
        &self.cur_messages
    }

    pub fn done_messages(&self) -> &[ChatMessage] {
        &self.done_messages
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn set_total_cost(&mut self, total_cost: f64) {
        self.total_cost = total_cost;
    }

    pub fn commit_hashes(&self) -> &[String] {
        &self.commit_hashes
    }

    /// Handle a completed response.
    ///
    /// Returns [`ReplyOutcome::Continue`] when nothing was delegated: an
    /// empty response, a declined prompt, a failed tweak or a failed crew
    /// run. Once the crew has answered the result is always a switch to the
    /// return edit format, whether or not the edits could be applied.
    pub async fn reply_completed(&mut self) -> Result<ReplyOutcome> {
        if self.partial_response_content.trim().is_empty() {
            debug!(target: "relaycode.coder", "empty response, nothing to delegate");
            return Ok(ReplyOutcome::Continue);
        }
        let mut request = self.partial_response_content.clone();

        let confirmation = self
            .io
            .confirm_ask(CONFIRM_PROMPT, self.settings.args.tweak_responses)
            .await?;
        if confirmation == ConfirmResponse::No && !self.settings.auto_accept {
            info!(target: "relaycode.coder", "delegation declined");
            return Ok(ReplyOutcome::Continue);
        }

        if confirmation == ConfirmResponse::Tweak {
            match self.io.edit_in_editor(&request).await {
                Ok(edited) => request = edited,
                Err(error) => {
                    self.io.tool_error(&format!("Failed to edit the request: {error:#}"));
                    return Ok(ReplyOutcome::Continue);
                }
            }
        }

        let crew = self.crew.connect(&self.settings.crew_identity);
        let crew_output = match crew.run(&request).await {
            Ok(output) => output,
            Err(error) => {
                warn!(target: "relaycode.coder", %error, "crew run failed");
                self.io.tool_error(&format!("Crew execution failed: {error}"));
                return Ok(ReplyOutcome::Continue);
            }
        };
        debug!(
            target: "relaycode.coder",
            crew = %self.settings.crew_identity.name,
            bytes = crew_output.len(),
            "crew finished"
        );

        if let Err(error) = self.apply_crew_output(&crew_output).await {
            warn!(target: "relaycode.coder", error = %error, "applying crew output failed");
            self.io.tool_error(&format!("Error applying crew changes: {error:#}"));
        }

        Ok(ReplyOutcome::Switch(SwitchCoder::new(
            self.settings.main_model.clone(),
            self.settings.return_edit_format.clone(),
        )))
    }

    async fn apply_crew_output(&mut self, crew_output: &str) -> Result<()> {
        let config = CoderConfig::for_editor(
            &self.settings.main_model,
            self.settings.args.clone(),
            self.total_cost,
        )
        .with_io(Arc::clone(&self.io))
        .with_lineage(CoderLineage {
            main_model: self.settings.main_model.name.clone(),
            edit_format: DELEGATED_EDIT_FORMAT.to_string(),
        });

        let mut editor = self.factory.create(config).await?;
        editor.clear_history();

        if self.settings.args.verbose {
            for line in editor.announcements() {
                self.io.tool_output(&line);
            }
        }

        editor.generate(crew_output, false).await?;

        self.done_messages.append(&mut self.cur_messages);
        self.done_messages.extend(editor.done_messages().iter().cloned());
        self.done_messages.extend(editor.cur_messages().iter().cloned());
        self.done_messages.push(ChatMessage::user(APPLIED_NOTE));
        self.done_messages.push(ChatMessage::assistant(ASSISTANT_ACK));

        self.total_cost = editor.total_cost();
        self.commit_hashes = editor.commit_hashes().to_vec();
        Ok(())
    }
}
