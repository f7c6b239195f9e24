use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use relaycode_config::RelayConfig;
use relaycode_core::{
    ChatMessage, DelegatedEditCoder, DelegationSettings, DryRunCoderFactory, NullCrew,
    ReplyOutcome, TerminalInteraction,
};

#[derive(Debug)]
pub struct DelegateCommandOptions {
    pub text: Option<String>,
    pub auto_accept: bool,
    pub tweak: bool,
    pub verbose: bool,
}

fn read_request(text: Option<String>) -> Result<String> {
    let request = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read the edit request from stdin")?;
            buffer
        }
    };
    if request.trim().is_empty() {
        bail!("the edit request is empty");
    }
    Ok(request)
}

fn settings_for(config: &RelayConfig, options: &DelegateCommandOptions) -> DelegationSettings {
    let mut settings = DelegationSettings::from_config(config);
    settings.auto_accept |= options.auto_accept;
    settings.args.tweak_responses |= options.tweak;
    settings.args.verbose |= options.verbose;
    settings
}

/// Run one delegation round with the null crew and a dry-run editor coder.
pub async fn handle_delegate_command(
    config: RelayConfig,
    options: DelegateCommandOptions,
) -> Result<()> {
    let settings = settings_for(&config, &options);
    let request = tokio::task::spawn_blocking(move || read_request(options.text))
        .await
        .context("failed to read the edit request")??;

    let io = Arc::new(TerminalInteraction::new(
        config.editor.preferred_editor().map(ToOwned::to_owned),
    ));
    let mut coder = DelegatedEditCoder::new(
        settings,
        io,
        Arc::new(NullCrew),
        Arc::new(DryRunCoderFactory),
    );
    coder.push_message(ChatMessage::user(request.clone()));
    coder.set_partial_response(request);

    match coder.reply_completed().await? {
        ReplyOutcome::Continue => println!("Nothing was delegated."),
        ReplyOutcome::Switch(switch) => println!(
            "Switching to the {} edit format with {}.",
            switch.edit_format, switch.main_model.name
        ),
    }
    Ok(())
}
