use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;
use crate::ui::{ConfirmResponse, UserInteraction};

/// Interaction that answers from a script and records everything shown.
struct RecordingInteraction {
    answer: ConfirmResponse,
    edited: Result<String, String>,
    prompts: Mutex<Vec<(String, bool)>>,
    edits: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    outputs: Mutex<Vec<String>>,
}

impl RecordingInteraction {
    fn answering(answer: ConfirmResponse) -> Arc<Self> {
        Self::with_edit(answer, Ok(String::new()))
    }

    fn with_edit(answer: ConfirmResponse, edited: Result<String, String>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            edited,
            prompts: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            outputs: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<(String, bool)> {
        self.prompts.lock().clone()
    }

    fn edits(&self) -> Vec<String> {
        self.edits.lock().clone()
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    fn outputs(&self) -> Vec<String> {
        self.outputs.lock().clone()
    }
}

#[async_trait]
impl UserInteraction for RecordingInteraction {
    async fn confirm_ask(&self, prompt: &str, allow_tweak: bool) -> Result<ConfirmResponse> {
        self.prompts.lock().push((prompt.to_string(), allow_tweak));
        Ok(self.answer)
    }

    async fn edit_in_editor(&self, text: &str) -> Result<String> {
        self.edits.lock().push(text.to_string());
        self.edited.clone().map_err(|err| anyhow!(err))
    }

    fn tool_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn tool_output(&self, message: &str) {
        self.outputs.lock().push(message.to_string());
    }
}

/// Crew provider with a fixed result that records every run.
#[derive(Clone)]
struct ScriptedCrew {
    result: Result<String, String>,
    inputs: Arc<Mutex<Vec<String>>>,
    identities: Arc<Mutex<Vec<CrewIdentity>>>,
}

impl ScriptedCrew {
    fn succeeding(output: &str) -> Self {
        Self::new(Ok(output.to_string()))
    }

    fn failing(message: &str) -> Self {
        Self::new(Err(message.to_string()))
    }

    fn new(result: Result<String, String>) -> Self {
        Self {
            result,
            inputs: Arc::new(Mutex::new(Vec::new())),
            identities: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl CrewClient for ScriptedCrew {
    async fn run(&self, input: &str) -> Result<String, CrewError> {
        self.inputs.lock().push(input.to_string());
        self.result.clone().map_err(CrewError::Execution)
    }
}

impl CrewProvider for ScriptedCrew {
    fn connect(&self, identity: &CrewIdentity) -> Box<dyn CrewClient> {
        self.identities.lock().push(identity.clone());
        Box::new(self.clone())
    }
}

/// Editor coder double with scripted generation.
struct ScriptedEditor {
    generate_result: Result<(), String>,
    cur_messages: Vec<ChatMessage>,
    done_messages: Vec<ChatMessage>,
    total_cost: f64,
    commit_hashes: Vec<String>,
    generated: Arc<Mutex<Vec<(String, bool)>>>,
    history_on_create: usize,
}

#[async_trait]
impl EditorCoder for ScriptedEditor {
    async fn generate(&mut self, user_message: &str, preproc: bool) -> Result<()> {
        self.generated.lock().push((user_message.to_string(), preproc));
        self.generate_result.clone().map_err(|err| anyhow!(err))?;
        self.cur_messages.push(ChatMessage::user(user_message));
        self.cur_messages
            .push(ChatMessage::assistant("applied edits"));
        self.total_cost += 0.25;
        self.commit_hashes.push("abc1234".to_string());
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
        vec![format!("stale history: {}", self.history_on_create)]
    }
}

#[derive(Default)]
struct ScriptedFactory {
    create_error: Option<String>,
    generate_errors: Mutex<VecDeque<String>>,
    configs: Mutex<Vec<CoderConfig>>,
    generated: Arc<Mutex<Vec<(String, bool)>>>,
    created: AtomicUsize,
}

impl ScriptedFactory {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn failing_create(message: &str) -> Arc<Self> {
        Arc::new(Self {
            create_error: Some(message.to_string()),
            ..Self::default()
        })
    }

    fn failing_generate(message: &str) -> Arc<Self> {
        let factory = Self::default();
        factory.generate_errors.lock().push_back(message.to_string());
        Arc::new(factory)
    }

    fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn configs(&self) -> Vec<CoderConfig> {
        self.configs.lock().clone()
    }

    fn generated(&self) -> Vec<(String, bool)> {
        self.generated.lock().clone()
    }
}

#[async_trait]
impl CoderFactory for ScriptedFactory {
    async fn create(&self, config: CoderConfig) -> Result<Box<dyn EditorCoder>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().push(config.clone());
        if let Some(message) = &self.create_error {
            return Err(anyhow!(message.clone()));
        }
        let generate_result = match self.generate_errors.lock().pop_front() {
            Some(message) => Err(message),
            None => Ok(()),
        };
        // Starts with leftover history to prove the caller clears it.
        Ok(Box::new(ScriptedEditor {
            generate_result,
            cur_messages: vec![ChatMessage::user("stale")],
            done_messages: vec![ChatMessage::assistant("stale")],
            total_cost: config.total_cost,
            commit_hashes: Vec::new(),
            generated: Arc::clone(&self.generated),
            history_on_create: 2,
        }))
    }
}

fn settings() -> DelegationSettings {
    DelegationSettings {
        main_model: ModelSettings::new("gpt-4o", "editor-diff").with_editor_model("gpt-4o-mini"),
        args: CoderArgs::default(),
        auto_accept: false,
        return_edit_format: "architect".to_string(),
        crew_identity: CrewIdentity::new("TestCrew", "Crew used in tests"),
    }
}

fn coder(
    settings: DelegationSettings,
    io: &Arc<RecordingInteraction>,
    crew: &ScriptedCrew,
    factory: &Arc<ScriptedFactory>,
) -> DelegatedEditCoder {
    let io: Arc<dyn UserInteraction> = io.clone();
    let crew: Arc<dyn CrewProvider> = Arc::new(crew.clone());
    let factory: Arc<dyn CoderFactory> = factory.clone();
    DelegatedEditCoder::new(settings, io, crew, factory)
}

fn expected_switch() -> ReplyOutcome {
    ReplyOutcome::Switch(SwitchCoder::new(settings().main_model, "architect"))
}

#[tokio::test]
async fn whitespace_response_is_a_no_op() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::new();
    let mut coder = coder(settings(), &io, &crew, &factory);

    for content in ["", "   \n\t "] {
        coder.set_partial_response(content);
        assert_eq!(coder.reply_completed().await?, ReplyOutcome::Continue);
    }

    assert!(io.prompts().is_empty());
    assert!(crew.inputs().is_empty());
    assert_eq!(factory.created(), 0);
    Ok(())
}

#[tokio::test]
async fn declined_request_has_no_side_effects() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::No);
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::new();
    let mut coder = coder(settings(), &io, &crew, &factory);
    coder.push_message(ChatMessage::user("rename the module"));
    coder.set_partial_response("rename foo to bar");

    assert_eq!(coder.reply_completed().await?, ReplyOutcome::Continue);

    assert_eq!(io.prompts(), vec![(CONFIRM_PROMPT.to_string(), false)]);
    assert!(crew.inputs().is_empty());
    assert_eq!(factory.created(), 0);
    assert_eq!(coder.cur_messages().len(), 1);
    assert!(coder.done_messages().is_empty());
    Ok(())
}

#[tokio::test]
async fn auto_accept_overrides_a_declined_prompt() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::No);
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::new();
    let mut coder = coder(
        DelegationSettings {
            auto_accept: true,
            ..settings()
        },
        &io,
        &crew,
        &factory,
    );
    coder.set_partial_response("rename foo to bar");

    assert_eq!(coder.reply_completed().await?, expected_switch());
    assert_eq!(crew.inputs(), vec!["rename foo to bar".to_string()]);
    Ok(())
}

#[tokio::test]
async fn crew_failure_reports_and_stops() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let crew = ScriptedCrew::failing("agents unreachable");
    let factory = ScriptedFactory::new();
    let mut coder = coder(settings(), &io, &crew, &factory);
    coder.push_message(ChatMessage::user("rename the module"));
    coder.set_total_cost(1.5);
    coder.set_partial_response("rename foo to bar");

    assert_eq!(coder.reply_completed().await?, ReplyOutcome::Continue);

    assert_eq!(
        io.errors(),
        vec!["Crew execution failed: agents unreachable".to_string()]
    );
    assert_eq!(factory.created(), 0);
    assert_eq!(coder.cur_messages().len(), 1);
    assert!(coder.done_messages().is_empty());
    assert!((coder.total_cost() - 1.5).abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn successful_delegation_merges_history_and_switches() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let crew = ScriptedCrew::succeeding("src/lib.rs\n<<<<<<< SEARCH\nfoo\n=======\nbar\n>>>>>>> REPLACE");
    let factory = ScriptedFactory::new();
    let mut coder = coder(settings(), &io, &crew, &factory);
    coder.push_message(ChatMessage::user("rename foo to bar"));
    coder.push_message(ChatMessage::assistant("Here is the plan."));
    coder.set_total_cost(1.0);
    coder.set_partial_response("Here is the plan.");

    let outcome = coder.reply_completed().await?;
    assert_eq!(outcome, expected_switch());

    assert_eq!(crew.inputs(), vec!["Here is the plan.".to_string()]);
    assert_eq!(
        crew.identities.lock().clone(),
        vec![CrewIdentity::new("TestCrew", "Crew used in tests")]
    );

    assert_eq!(factory.created(), 1);
    assert_eq!(
        factory.generated(),
        vec![(crew.result.clone().expect("ok"), false)]
    );

    assert!(coder.cur_messages().is_empty());
    let done: Vec<_> = coder
        .done_messages()
        .iter()
        .map(|message| (message.role, message.content.as_str()))
        .collect();
    assert_eq!(
        done,
        vec![
            (MessageRole::User, "rename foo to bar"),
            (MessageRole::Assistant, "Here is the plan."),
            (MessageRole::User, crew.result.as_deref().expect("ok")),
            (MessageRole::Assistant, "applied edits"),
            (MessageRole::User, APPLIED_NOTE),
            (MessageRole::Assistant, ASSISTANT_ACK),
        ]
    );
    assert!((coder.total_cost() - 1.25).abs() < f64::EPSILON);
    assert_eq!(coder.commit_hashes(), ["abc1234".to_string()]);
    assert!(io.errors().is_empty());
    Ok(())
}

#[tokio::test]
async fn editor_coder_gets_editor_configuration() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::new();
    let mut coder = coder(settings(), &io, &crew, &factory);
    coder.set_total_cost(2.0);
    coder.set_partial_response("do it");

    coder.reply_completed().await?;

    let configs = factory.configs();
    assert_eq!(configs.len(), 1);
    let config = &configs[0];
    assert_eq!(config.main_model, "gpt-4o-mini");
    assert_eq!(config.edit_format, "editor-diff");
    assert!(!config.suggest_shell_commands);
    assert_eq!(config.map_tokens, 0);
    assert!(!config.cache_prompts);
    assert_eq!(config.num_cache_warming_pings, 0);
    assert!(!config.summarize_from_coder);
    assert!(config.mcp_servers.is_empty());
    assert!(config.io.is_some());
    assert!((config.total_cost - 2.0).abs() < f64::EPSILON);
    assert_eq!(
        config.from_coder,
        Some(CoderLineage {
            main_model: "gpt-4o".to_string(),
            edit_format: DELEGATED_EDIT_FORMAT.to_string(),
        })
    );
    Ok(())
}

#[tokio::test]
async fn generation_failure_still_switches() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::failing_generate("malformed edit block");
    let mut coder = coder(settings(), &io, &crew, &factory);
    coder.push_message(ChatMessage::user("rename foo to bar"));
    coder.set_total_cost(1.0);
    coder.set_partial_response("plan it");

    assert_eq!(coder.reply_completed().await?, expected_switch());

    assert_eq!(
        io.errors(),
        vec!["Error applying crew changes: malformed edit block".to_string()]
    );
    assert_eq!(coder.cur_messages().len(), 1);
    assert!(coder.done_messages().is_empty());
    assert!((coder.total_cost() - 1.0).abs() < f64::EPSILON);
    assert!(coder.commit_hashes().is_empty());
    Ok(())
}

#[tokio::test]
async fn factory_failure_still_switches() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::failing_create("unknown edit format");
    let mut coder = coder(settings(), &io, &crew, &factory);
    coder.set_partial_response("plan it");

    assert_eq!(coder.reply_completed().await?, expected_switch());
    assert_eq!(
        io.errors(),
        vec!["Error applying crew changes: unknown edit format".to_string()]
    );
    assert!(factory.generated().is_empty());
    Ok(())
}

#[tokio::test]
async fn tweak_sends_the_edited_text() -> Result<()> {
    let io = RecordingInteraction::with_edit(
        ConfirmResponse::Tweak,
        Ok("rename foo to baz".to_string()),
    );
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::new();
    let mut coder = coder(
        DelegationSettings {
            args: CoderArgs {
                tweak_responses: true,
                verbose: false,
            },
            ..settings()
        },
        &io,
        &crew,
        &factory,
    );
    coder.set_partial_response("rename foo to bar");

    assert_eq!(coder.reply_completed().await?, expected_switch());
    assert_eq!(io.prompts(), vec![(CONFIRM_PROMPT.to_string(), true)]);
    assert_eq!(io.edits(), vec!["rename foo to bar".to_string()]);
    assert_eq!(crew.inputs(), vec!["rename foo to baz".to_string()]);
    Ok(())
}

#[tokio::test]
async fn failed_tweak_aborts_before_the_crew() -> Result<()> {
    let io = RecordingInteraction::with_edit(
        ConfirmResponse::Tweak,
        Err("editor exited with non-zero status: 1".to_string()),
    );
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::new();
    let mut coder = coder(settings(), &io, &crew, &factory);
    coder.set_partial_response("rename foo to bar");

    assert_eq!(coder.reply_completed().await?, ReplyOutcome::Continue);
    assert_eq!(
        io.errors(),
        vec!["Failed to edit the request: editor exited with non-zero status: 1".to_string()]
    );
    assert!(crew.inputs().is_empty());
    Ok(())
}

#[tokio::test]
async fn verbose_shows_editor_announcements() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let crew = ScriptedCrew::succeeding("plan");
    let factory = ScriptedFactory::new();
    let mut coder = coder(
        DelegationSettings {
            args: CoderArgs {
                tweak_responses: false,
                verbose: true,
            },
            ..settings()
        },
        &io,
        &crew,
        &factory,
    );
    coder.set_partial_response("plan it");

    coder.reply_completed().await?;
    assert_eq!(io.outputs(), vec!["stale history: 2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn dry_run_editor_prints_through_interaction() -> Result<()> {
    let io = RecordingInteraction::answering(ConfirmResponse::Yes);
    let factory: Arc<dyn CoderFactory> = Arc::new(DryRunCoderFactory);
    let crew: Arc<dyn CrewProvider> = Arc::new(NullCrew);
    let interaction: Arc<dyn UserInteraction> = io.clone();
    let mut coder = DelegatedEditCoder::new(settings(), interaction, crew, factory);
    coder.set_partial_response("rename foo to bar");

    assert_eq!(coder.reply_completed().await?, expected_switch());
    assert_eq!(
        io.outputs(),
        vec![
            "Would apply editor-diff edits with gpt-4o-mini:".to_string(),
            NULL_CREW_OUTPUT.to_string(),
        ]
    );
    assert_eq!(
        coder.done_messages().last(),
        Some(&ChatMessage::assistant(ASSISTANT_ACK))
    );
    Ok(())
}

#[test]
fn settings_follow_configuration() {
    let mut config = relaycode_config::RelayConfig::default();
    config.agent.model = "o3".to_string();
    config.agent.auto_accept_delegation = true;
    config.agent.tweak_responses = true;
    config.crew.name = "Reviewers".to_string();

    let settings = DelegationSettings::from_config(&config);
    assert_eq!(settings.main_model.name, "o3");
    assert!(settings.auto_accept);
    assert!(settings.args.tweak_responses);
    assert_eq!(settings.return_edit_format, "architect");
    assert_eq!(settings.crew_identity.name, "Reviewers");
}
