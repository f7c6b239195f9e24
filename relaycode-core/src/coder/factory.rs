//! The seam to the host's edit-applying coders.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::messages::ChatMessage;
use super::models::ModelSettings;
use crate::ui::UserInteraction;

/// Runtime flags shared between a coder and the coders it spawns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoderArgs {
    pub tweak_responses: bool,
    pub verbose: bool,
}

/// Where a coder was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoderLineage {
    pub main_model: String,
    pub edit_format: String,
}

/// Everything a [`CoderFactory`] needs to build a coder.
#[derive(Clone)]
pub struct CoderConfig {
    pub main_model: String,
    pub edit_format: String,
    pub args: CoderArgs,
    pub suggest_shell_commands: bool,
    pub map_tokens: usize,
    pub total_cost: f64,
    pub cache_prompts: bool,
    pub num_cache_warming_pings: usize,
    pub summarize_from_coder: bool,
    pub mcp_servers: Vec<String>,
    pub io: Option<Arc<dyn UserInteraction>>,
    pub from_coder: Option<CoderLineage>,
}

impl CoderConfig {
    /// Configuration for a throwaway editor coder: the editor sub-model with
    /// its edit format, and no shell suggestions, repo map, prompt caching or
    /// tool servers.
    pub fn for_editor(model: &ModelSettings, args: CoderArgs, total_cost: f64) -> Self {
        Self {
            main_model: model.editor_model_name().to_string(),
            edit_format: model.editor_edit_format.clone(),
            args,
            suggest_shell_commands: false,
            map_tokens: 0,
            total_cost,
            cache_prompts: false,
            num_cache_warming_pings: 0,
            summarize_from_coder: false,
            mcp_servers: Vec::new(),
            io: None,
            from_coder: None,
        }
    }

    pub fn with_io(mut self, io: Arc<dyn UserInteraction>) -> Self {
        self.io = Some(io);
        self
    }

    pub fn with_lineage(mut self, lineage: CoderLineage) -> Self {
        self.from_coder = Some(lineage);
        self
    }
}

impl fmt::Debug for CoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoderConfig")
            .field("main_model", &self.main_model)
            .field("edit_format", &self.edit_format)
            .field("args", &self.args)
            .field("suggest_shell_commands", &self.suggest_shell_commands)
            .field("map_tokens", &self.map_tokens)
            .field("total_cost", &self.total_cost)
            .field("cache_prompts", &self.cache_prompts)
            .field("num_cache_warming_pings", &self.num_cache_warming_pings)
            .field("summarize_from_coder", &self.summarize_from_coder)
            .field("mcp_servers", &self.mcp_servers)
            .field("io", &self.io.is_some())
            .field("from_coder", &self.from_coder)
            .finish()
    }
}

/// A coder that turns a message into applied file edits.
#[async_trait]
pub trait EditorCoder: Send {
    /// Process `user_message`. With `preproc` off the text is used verbatim,
    /// never interpreted as a command or mention.
    async fn generate(&mut self, user_message: &str, preproc: bool) -> Result<()>;

    fn cur_messages(&self) -> &[ChatMessage];

    fn done_messages(&self) -> &[ChatMessage];

    /// Drop both halves of the conversation history.
    fn clear_history(&mut self);

    fn total_cost(&self) -> f64;

    fn commit_hashes(&self) -> &[String];

    /// Startup lines describing the coder's model and mode.
    fn announcements(&self) -> Vec<String>;
}

#[async_trait]
pub trait CoderFactory: Send + Sync {
    async fn create(&self, config: CoderConfig) -> Result<Box<dyn EditorCoder>>;
}
