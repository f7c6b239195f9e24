//! relaycode CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use relaycode_config::{ConfigManager, DebugConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

mod cli;

use cli::{Cli, Commands, DelegateCommandOptions, RunCommandOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let manager = load_config(&args)?;
    initialize_tracing(&manager.config().debug);

    match args.command {
        Commands::Run {
            verbose,
            cwd,
            command,
        } => {
            let options = RunCommandOptions {
                command,
                verbose,
                cwd,
            };
            let exit_code = tokio::task::spawn_blocking(move || cli::handle_run_command(options))
                .await
                .context("command runner task failed")??;
            std::process::exit(exit_code);
        }
        Commands::Delegate {
            auto_accept,
            tweak,
            verbose,
            text,
        } => {
            let options = DelegateCommandOptions {
                text,
                auto_accept,
                tweak,
                verbose,
            };
            cli::handle_delegate_command(manager.into_config(), options).await
        }
        Commands::Config => cli::handle_config_command(&manager),
    }
}

fn load_config(args: &Cli) -> Result<ConfigManager> {
    if let Some(path) = &args.config_file {
        return ConfigManager::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }
    if let Some(workspace) = &args.workspace {
        return ConfigManager::load_from_workspace(workspace).with_context(|| {
            format!(
                "Failed to load configuration for workspace {}",
                workspace.display()
            )
        });
    }
    ConfigManager::load()
}

/// Install the stderr subscriber. `RUST_LOG` wins; otherwise `[debug]`
/// decides whether tracing is on and which targets it covers.
fn initialize_tracing(debug_cfg: &DebugConfig) {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
        return;
    }

    if !debug_cfg.enable_tracing {
        return;
    }

    let filter = debug_cfg.filter_directive();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            target: "relaycode.cli",
            "Debug tracing enabled: filter={}, level={}",
            filter,
            debug_cfg.trace_level
        );
    }
}
