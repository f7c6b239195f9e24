use std::io::IsTerminal;

/// Whether this build carries the pseudo-terminal backend.
pub const PTY_AVAILABLE: bool = cfg!(unix);

/// Operating system family the runner is executing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }
}

/// How a command gets executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStrategy {
    /// Child attached to a pseudo-terminal, user keeps terminal control.
    Interactive,
    /// Child output captured through an anonymous pipe.
    Buffered,
}

/// Pick the execution strategy for the sensed environment.
///
/// The interactive strategy needs all three conditions at once: an
/// interactive stdin, a pty backend, and a host other than Windows.
pub fn select_strategy(is_tty: bool, pty_available: bool, host_os: HostOs) -> ExecutionStrategy {
    if is_tty && pty_available && !host_os.is_windows() {
        ExecutionStrategy::Interactive
    } else {
        ExecutionStrategy::Buffered
    }
}

/// Snapshot of the inputs to [`select_strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionEnvironment {
    pub is_tty: bool,
    pub pty_available: bool,
    pub host_os: HostOs,
}

impl ExecutionEnvironment {
    /// Sense the environment of the calling process.
    pub fn detect() -> Self {
        Self {
            is_tty: std::io::stdin().is_terminal(),
            pty_available: PTY_AVAILABLE,
            host_os: HostOs::current(),
        }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        select_strategy(self.is_tty, self.pty_available, self.host_os)
    }
}
