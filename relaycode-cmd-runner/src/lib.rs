//! Single-command runner. A command either gets an interactive
//! pseudo-terminal (when stdin is a TTY on a platform with pty support) or a
//! plain subprocess whose stdout and stderr share one pipe. Both paths echo
//! output live and hand back the exit code together with everything the
//! command printed.

pub mod decode;
pub mod parent;
pub mod pipe;
#[cfg(unix)]
pub mod pty;
pub mod runner;
pub mod shell;
pub mod strategy;

pub use decode::Utf8Decoder;
pub use parent::{
    KNOWN_PARENT_SHELLS, MAX_PARENT_DEPTH, ProcessEntry, ProcessTree, SystemProcessTree,
    get_windows_parent_process_name, windows_parent_process_name,
};
pub use pipe::PipeStrategy;
#[cfg(unix)]
pub use pty::PtyStrategy;
pub use runner::{
    CommandRequest, CommandResult, CommandRunner, CommandStrategy, format_top_level_error,
    run_cmd,
};
pub use shell::{DEFAULT_SHELL, process_multiline_command, resolve_shell};
pub use strategy::{ExecutionEnvironment, ExecutionStrategy, HostOs, PTY_AVAILABLE, select_strategy};
