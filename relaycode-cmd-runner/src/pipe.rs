//! Buffered strategy: stdout and stderr share one anonymous pipe that is
//! drained while the child runs.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::decode::Utf8Decoder;
use crate::parent::get_windows_parent_process_name;
use crate::runner::{CommandRequest, CommandResult, CommandStrategy};
use crate::shell::{process_multiline_command, resolve_shell};
use crate::strategy::HostOs;

const READ_CHUNK_SIZE: usize = 4096;

/// Runs a command through the shell with merged output.
///
/// Every failure, including a failed spawn, is folded into exit code 1 with
/// the error text as output, so [`CommandStrategy::run`] never returns `Err`.
#[derive(Debug, Clone, Copy)]
pub struct PipeStrategy {
    echo: bool,
}

impl Default for PipeStrategy {
    fn default() -> Self {
        Self { echo: true }
    }
}

impl PipeStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture output without echoing it to stdout.
    pub fn quiet() -> Self {
        Self { echo: false }
    }

    /// Run `request`, echoing output to `echo`, and fold any failure into
    /// exit code 1.
    fn capture(&self, request: &CommandRequest, echo: &mut dyn Write) -> CommandResult {
        self.execute(request, echo)
            .unwrap_or_else(|err| CommandResult::failure(err.to_string()))
    }

    fn execute(
        &self,
        request: &CommandRequest,
        echo: &mut dyn Write,
    ) -> io::Result<CommandResult> {
        if request.verbose {
            println!("Using buffered subprocess: {}", request.command);
        }

        let shell = resolve_shell();
        let host = HostOs::current();
        let mut command = request.command.clone();
        let mut parent_process = None;

        if host.is_windows() {
            parent_process = get_windows_parent_process_name();
            if parent_process.as_deref() == Some("powershell.exe") {
                command = format!("powershell -Command {command}");
            }
        }

        if request.verbose {
            println!("Running command: {command}");
            println!("SHELL: {shell}");
            if host.is_windows() {
                println!(
                    "Parent process: {}",
                    parent_process.as_deref().unwrap_or("None")
                );
            }
        }

        let script = process_multiline_command(&command);
        let (mut reader, writer) = io::pipe()?;

        // The builder owns the parent's copies of the write end; it has to be
        // dropped before reading or EOF never arrives.
        let mut child = {
            let mut builder = shell_command(&shell, &script);
            if let Some(cwd) = &request.cwd {
                builder.current_dir(cwd);
            }
            builder
                .stdin(Stdio::inherit())
                .stdout(writer.try_clone()?)
                .stderr(writer)
                .spawn()?
        };
        debug!(target: "relaycode.cmd_runner", pid = child.id(), %shell, "spawned buffered command");

        let mut output = String::new();
        if let Err(err) = pump(&mut reader, echo, &mut output) {
            // Nobody drains the pipe any more, so a chatty child would block
            // on write forever.
            drop(reader);
            if let Err(kill_error) = child.kill() {
                debug!(
                    target: "relaycode.cmd_runner",
                    error = %kill_error,
                    "child already gone"
                );
            }
            child.wait()?;
            return Err(err);
        }
        let status = child.wait()?;

        Ok(CommandResult::new(exit_code(status), output))
    }
}

fn pump(reader: &mut impl Read, echo: &mut dyn Write, output: &mut String) -> io::Result<()> {
    let mut decoder = Utf8Decoder::new();
    let mut buffer = [0u8; READ_CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        let text = decoder.push(&buffer[..read]);
        emit(echo, &text)?;
        output.push_str(&text);
    }

    let tail = decoder.finish();
    emit(echo, &tail)?;
    output.push_str(&tail);
    Ok(())
}

fn emit(echo: &mut dyn Write, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    echo.write_all(text.as_bytes())?;
    echo.flush()
}

impl CommandStrategy for PipeStrategy {
    fn name(&self) -> &'static str {
        "buffered"
    }

    fn run(&self, request: &CommandRequest) -> io::Result<CommandResult> {
        let result = if self.echo {
            self.capture(request, &mut io::stdout())
        } else {
            self.capture(request, &mut io::sink())
        };
        Ok(result)
    }
}

#[cfg(unix)]
fn shell_command(shell: &str, script: &str) -> Command {
    let mut command = Command::new(shell);
    command.arg("-c").arg(script);
    command
}

#[cfg(windows)]
fn shell_command(_shell: &str, script: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let interpreter = std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string());
    let mut command = Command::new(interpreter);
    command.arg("/C").raw_arg(script);
    command
}

/// Exit code as a shell reports it; a signal death on unix becomes the
/// negated signal number.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    1
}
