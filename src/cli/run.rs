use std::path::PathBuf;

use anyhow::{Result, bail};
use relaycode_cmd_runner::run_cmd;
use relaycode_commons::StdoutErrorReporter;

#[derive(Debug)]
pub struct RunCommandOptions {
    pub command: Vec<String>,
    pub verbose: bool,
    pub cwd: Option<PathBuf>,
}

/// Rebuild the command line. One argument is taken as a complete shell
/// command; several are quoted back together so each stays one word.
fn command_line(words: &[String]) -> Result<String> {
    match words {
        [] => bail!("no command given"),
        [single] => Ok(single.clone()),
        words => Ok(shell_words::join(words)),
    }
}

/// Process exit code for a command result. Signal deaths come back negative
/// and are reported the way shells do, as 128 + signal.
fn process_exit_code(exit_code: i32) -> i32 {
    if exit_code < 0 {
        128 + exit_code.saturating_neg()
    } else {
        exit_code
    }
}

pub fn handle_run_command(options: RunCommandOptions) -> Result<i32> {
    let command = command_line(&options.command)?;
    let result = run_cmd(
        &command,
        options.verbose,
        Some(&StdoutErrorReporter),
        options.cwd.as_deref(),
    );
    tracing::debug!(
        target: "relaycode.cli",
        exit_code = result.exit_code,
        captured = result.output.len(),
        "run finished"
    );
    Ok(process_exit_code(result.exit_code))
}
