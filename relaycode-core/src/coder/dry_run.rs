use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::factory::{CoderConfig, CoderFactory, EditorCoder};
use super::messages::ChatMessage;
use crate::ui::UserInteraction;

const DRY_RUN_REPLY: &str = "Dry run: no files were changed.";

/// Factory for [`DryRunCoder`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunCoderFactory;

#[async_trait]
impl CoderFactory for DryRunCoderFactory {
    async fn create(&self, config: CoderConfig) -> Result<Box<dyn EditorCoder>> {
        debug!(target: "relaycode.coder", ?config, "creating dry-run editor coder");
        Ok(Box::new(DryRunCoder::new(config)))
    }
}

/// Editor coder that prints the edits it receives instead of applying them.
pub struct DryRunCoder {
    main_model: String,
    edit_format: String,
    io: Option<Arc<dyn UserInteraction>>,
    cur_messages: Vec<ChatMessage>,
    done_messages: Vec<ChatMessage>,
    total_cost: f64,
    commit_hashes: Vec<String>,
}

impl DryRunCoder {
    pub fn new(config: CoderConfig) -> Self {
        Self {
            main_model: config.main_model,
            edit_format: config.edit_format,
            io: config.io,
            cur_messages: Vec::new(),
            done_messages: Vec::new(),
            total_cost: config.total_cost,
            commit_hashes: Vec::new(),
        }
    }

    fn output(&self, message: &str) {
        match &self.io {
            Some(io) => io.tool_output(message),
            None => println!("{message}"),
        }
    }
}

#[async_trait]
impl EditorCoder for DryRunCoder {
    async fn generate(&mut self, user_message: &str, _preproc: bool) -> Result<()> {
        self.output(&format!(
            "Would apply {} edits with {}:",
            self.edit_format, self.main_model
        ));
        self.output(user_message);

        self.cur_messages.push(ChatMessage::user(user_message));
        self.cur_messages.push(ChatMessage::assistant(DRY_RUN_REPLY));
        Ok(())
    }

    fn cur_messages(&self) -> &[ChatMessage] {
        &self.cur_messages
    }

    fn done_messages(&self) -> &[ChatMessage] {
        &self.done_messages
    }

    fn clear_history(&mut self) {
        self.cur_messages.clear();
        self.done_messages.clear();
    }

    fn total_cost(&self) -> f64 {
        self.total_cost
    }

    fn commit_hashes(&self) -> &[String] {
        &self.commit_hashes
    }

    fn announcements(&self) -> Vec<String> {
        vec![
            format!("Editor model: {} with {} edit format", self.main_model, self.edit_format),
            "Dry run: edits are printed, not applied".to_string(),
        ]
    }
}
