//! Interactive strategy: the child runs on a pseudo-terminal while the user
//! keeps control of the local terminal.

use std::ffi::OsString;
use std::io::{self, IsTerminal, Read, Write};
use std::os::fd::AsFd;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use tracing::{debug, warn};

use crate::runner::{CommandRequest, CommandResult, CommandStrategy};
use crate::shell::resolve_shell;

const DEFAULT_COLS: u16 = 80;
const DEFAULT_ROWS: u16 = 24;
const IO_BUFFER_SIZE: usize = 8192;
const STDIN_POLL_MS: u16 = 100;

/// Runs a command on a pseudo-terminal, forwarding keystrokes and echoing
/// output while capturing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PtyStrategy;

/// Puts the local terminal into raw mode and restores it on drop.
struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    fn enable() -> Self {
        let enabled = io::stdin().is_terminal() && crossterm::terminal::enable_raw_mode().is_ok();
        Self { enabled }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled
            && let Err(error) = crossterm::terminal::disable_raw_mode()
        {
            warn!(target: "relaycode.cmd_runner", %error, "failed to restore terminal mode");
        }
    }
}

/// Size of the controlling terminal, or 80x24 when it cannot be read.
fn terminal_size() -> PtySize {
    let (cols, rows) = crossterm::terminal::size()
        .ok()
        .filter(|(cols, rows)| *cols > 0 && *rows > 0)
        .unwrap_or((DEFAULT_COLS, DEFAULT_ROWS));
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// Build the child command.
///
/// When the shell exists it runs `<shell> -i -c <command>`; otherwise the
/// command is split with shell-word rules and executed directly.
fn build_command(
    shell: &str,
    command: &str,
    cwd: Option<&Path>,
    verbose: bool,
) -> Result<CommandBuilder, String> {
    let mut builder = if Path::new(shell).exists() {
        if verbose {
            println!("Spawning with shell: {shell}");
        }
        let mut builder = CommandBuilder::new(shell);
        builder.args(["-i", "-c", command]);
        builder
    } else {
        if verbose {
            println!("Spawning without shell.");
        }
        let argv = shell_words::split(command).map_err(|err| err.to_string())?;
        if argv.is_empty() {
            return Err("empty command".to_string());
        }
        CommandBuilder::from_argv(argv.into_iter().map(OsString::from).collect())
    };

    if let Some(cwd) = cwd {
        builder.cwd(cwd);
    }
    Ok(builder)
}

fn exit_status_code(status: &portable_pty::ExitStatus) -> i32 {
    if status.signal().is_some() {
        1
    } else {
        i32::try_from(status.exit_code()).unwrap_or(1)
    }
}

/// Forward stdin to the child until `stop` is raised or stdin closes.
fn spawn_stdin_forwarder(
    mut writer: Box<dyn Write + Send>,
    stop: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("relaycode-pty-stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let mut buffer = [0u8; IO_BUFFER_SIZE];

            while !stop.load(Ordering::Relaxed) {
                let mut fds = [PollFd::new(stdin.as_fd(), PollFlags::POLLIN)];
                match poll(&mut fds, PollTimeout::from(STDIN_POLL_MS)) {
                    Ok(0) => continue,
                    Ok(_) => {}
                    Err(Errno::EINTR) => continue,
                    Err(_) => break,
                }

                let revents = fds[0].revents().unwrap_or(PollFlags::empty());
                if revents.intersects(PollFlags::POLLERR | PollFlags::POLLNVAL) {
                    break;
                }
                if !revents.intersects(PollFlags::POLLIN | PollFlags::POLLHUP) {
                    continue;
                }

                let read = match stdin.lock().read(&mut buffer) {
                    Ok(0) => break,
                    Ok(read) => read,
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                };
                if writer
                    .write_all(&buffer[..read])
                    .and_then(|()| writer.flush())
                    .is_err()
                {
                    break;
                }
            }
        })
}

/// Echo and capture everything the child writes until the pty closes.
///
/// Linux reports a closed slave side as `EIO`, which ends the stream like EOF.
fn pump_output(reader: &mut dyn Read, capture: &mut Vec<u8>) {
    let mut buffer = [0u8; IO_BUFFER_SIZE];
    let mut stdout = io::stdout();

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(target: "relaycode.cmd_runner", error = %err, "pty read ended");
                break;
            }
        };
        let chunk = &buffer[..read];
        capture.extend_from_slice(chunk);
        if stdout.write_all(chunk).and_then(|()| stdout.flush()).is_err() {
            debug!(target: "relaycode.cmd_runner", "stdout closed, capture continues");
        }
    }
}

impl CommandStrategy for PtyStrategy {
    fn name(&self) -> &'static str {
        "interactive"
    }

    fn run(&self, request: &CommandRequest) -> io::Result<CommandResult> {
        let command = request.command.as_str();
        if request.verbose {
            println!("Using pseudo-terminal: {command}");
        }

        let shell = resolve_shell();
        if request.verbose {
            println!("With shell: {shell}");
        }

        let builder = match build_command(&shell, command, request.cwd.as_deref(), request.verbose)
        {
            Ok(builder) => builder,
            Err(err) => {
                return Ok(CommandResult::failure(format!(
                    "Error running command {command}: {err}"
                )));
            }
        };

        let pair = native_pty_system()
            .openpty(terminal_size())
            .map_err(|err| io::Error::other(format!("failed to allocate PTY pair: {err:#}")))?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|err| io::Error::other(format!("failed to clone PTY reader: {err:#}")))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|err| io::Error::other(format!("failed to take PTY writer: {err:#}")))?;

        let mut child = match pair.slave.spawn_command(builder) {
            Ok(child) => child,
            Err(err) => {
                return Ok(CommandResult::failure(format!(
                    "Error running command {command}: {err:#}"
                )));
            }
        };
        // Only the child may hold the slave side, otherwise reads never see EOF.
        drop(pair.slave);
        debug!(target: "relaycode.cmd_runner", pid = ?child.process_id(), %shell, "spawned pty command");

        let mut capture = Vec::new();
        let status = {
            let _raw_mode = RawModeGuard::enable();
            let stop = Arc::new(AtomicBool::new(false));
            let forwarder = spawn_stdin_forwarder(writer, Arc::clone(&stop))?;

            pump_output(reader.as_mut(), &mut capture);
            let status = child.wait();

            stop.store(true, Ordering::Relaxed);
            if forwarder.join().is_err() {
                warn!(target: "relaycode.cmd_runner", "stdin forwarder panicked");
            }
            status?
        };
        drop(pair.master);

        Ok(CommandResult::new(
            exit_status_code(&status),
            String::from_utf8_lossy(&capture).into_owned(),
        ))
    }
}
