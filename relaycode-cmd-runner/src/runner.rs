use std::io;
use std::path::{Path, PathBuf};

use relaycode_commons::ErrorReporter;
use tracing::{debug, warn};

use crate::pipe::PipeStrategy;
use crate::strategy::{ExecutionEnvironment, ExecutionStrategy};

/// One command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub command: String,
    pub verbose: bool,
    pub cwd: Option<PathBuf>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            verbose: false,
            cwd: None,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn cwd(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }
}

/// Exit code and the text the command printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub output: String,
}

impl CommandResult {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// Result used for every failure path: exit code 1 plus the message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(1, message)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A way of executing a command.
///
/// Strategies normalise expected failures into a [`CommandResult`] on their
/// own. An `Err` is reserved for failures the strategy cannot describe, and is
/// turned into a result by [`CommandRunner::run`].
pub trait CommandStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, request: &CommandRequest) -> io::Result<CommandResult>;
}

/// Message reported when a strategy fails outright.
pub fn format_top_level_error(command: &str, error: &dyn std::fmt::Display) -> String {
    format!("Error occurred while running command '{command}': {error}")
}

/// Picks a strategy for the current environment and runs commands with it.
pub struct CommandRunner {
    environment: ExecutionEnvironment,
    interactive: Option<Box<dyn CommandStrategy>>,
    buffered: Box<dyn CommandStrategy>,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner {
    /// Runner for the calling process, with the built-in strategies.
    pub fn new() -> Self {
        #[cfg(unix)]
        let interactive: Option<Box<dyn CommandStrategy>> = Some(Box::new(crate::pty::PtyStrategy));
        #[cfg(not(unix))]
        let interactive: Option<Box<dyn CommandStrategy>> = None;

        Self {
            environment: ExecutionEnvironment::detect(),
            interactive,
            buffered: Box::new(PipeStrategy::default()),
        }
    }

    /// Runner with an explicit environment and strategies.
    pub fn with_strategies(
        environment: ExecutionEnvironment,
        interactive: Option<Box<dyn CommandStrategy>>,
        buffered: Box<dyn CommandStrategy>,
    ) -> Self {
        Self {
            environment,
            interactive,
            buffered,
        }
    }

    fn strategy_for(&self, strategy: ExecutionStrategy) -> &dyn CommandStrategy {
        match (strategy, self.interactive.as_deref()) {
            (ExecutionStrategy::Interactive, Some(interactive)) => interactive,
            _ => self.buffered.as_ref(),
        }
    }

    pub fn run(
        &self,
        command: &str,
        verbose: bool,
        error_sink: Option<&dyn ErrorReporter>,
        cwd: Option<&Path>,
    ) -> CommandResult {
        let request = CommandRequest::new(command)
            .verbose(verbose)
            .cwd(cwd.map(Path::to_path_buf));
        self.execute(&request, error_sink)
    }

    pub fn execute(
        &self,
        request: &CommandRequest,
        error_sink: Option<&dyn ErrorReporter>,
    ) -> CommandResult {
        let strategy = self.strategy_for(self.environment.strategy());
        debug!(
            target: "relaycode.cmd_runner",
            strategy = strategy.name(),
            command = %request.command,
            "running command"
        );

        match strategy.run(request) {
            Ok(result) => {
                debug!(
                    target: "relaycode.cmd_runner",
                    exit_code = result.exit_code,
                    "command finished"
                );
                result
            }
            Err(error) => {
                let message = format_top_level_error(&request.command, &error);
                warn!(target: "relaycode.cmd_runner", %error, "command failed to run");
                match error_sink {
                    Some(sink) => {
                        if let Err(report_error) = sink.capture_message(&message) {
                            warn!(
                                target: "relaycode.cmd_runner",
                                error = %report_error,
                                "error sink rejected message"
                            );
                        }
                    }
                    None => println!("{message}"),
                }
                CommandResult::failure(message)
            }
        }
    }
}

/// Run `command` with the strategy picked for the current environment.
pub fn run_cmd(
    command: &str,
    verbose: bool,
    error_sink: Option<&dyn ErrorReporter>,
    cwd: Option<&Path>,
) -> CommandResult {
    CommandRunner::new().run(command, verbose, error_sink, cwd)
}
