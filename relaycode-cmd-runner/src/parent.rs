//! Parent shell detection for Windows hosts.
//!
//! The pipe strategy needs to know whether it was launched from PowerShell so
//! it can route the command through `powershell -Command`. The lookup walks
//! the process parent chain through a [`ProcessTree`] so the walk itself can
//! be exercised against a scripted tree on any platform.

use anyhow::{Result, anyhow};
use sysinfo::{Pid, System};
use tracing::debug;

/// Shell executables recognised as interactive parents, lower-case.
pub const KNOWN_PARENT_SHELLS: [&str; 2] = ["powershell.exe", "cmd.exe"];

/// Upper bound on ancestors visited, guarding against cyclic process data.
pub const MAX_PARENT_DEPTH: usize = 64;

/// One process in the parent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
}

/// Read access to the process table.
pub trait ProcessTree {
    /// Pid of the calling process, if it can be determined.
    fn current_pid(&self) -> Result<u32>;

    /// Parent of `pid`. `Ok(None)` means `pid` has no parent; an error means
    /// the lookup itself failed.
    fn parent_of(&self, pid: u32) -> Result<Option<ProcessEntry>>;
}

/// [`ProcessTree`] backed by a `sysinfo` snapshot of the process table.
pub struct SystemProcessTree {
    system: System,
}

impl SystemProcessTree {
    pub fn snapshot() -> Self {
        let mut system = System::new();
        system.refresh_processes();
        Self { system }
    }
}

impl ProcessTree for SystemProcessTree {
    fn current_pid(&self) -> Result<u32> {
        sysinfo::get_current_pid()
            .map(|pid| pid.as_u32())
            .map_err(|err| anyhow!("failed to resolve current pid: {err}"))
    }

    fn parent_of(&self, pid: u32) -> Result<Option<ProcessEntry>> {
        let process = self
            .system
            .process(Pid::from_u32(pid))
            .ok_or_else(|| anyhow!("process {pid} is not in the process table"))?;
        let Some(parent_pid) = process.parent() else {
            return Ok(None);
        };
        let parent = self
            .system
            .process(parent_pid)
            .ok_or_else(|| anyhow!("parent process {parent_pid} is not in the process table"))?;
        Ok(Some(ProcessEntry {
            pid: parent_pid.as_u32(),
            name: parent.name().to_string(),
        }))
    }
}

/// Name of the nearest ancestor that is a known Windows shell.
///
/// Names are compared lower-case. Returns `None` when no ancestor matches,
/// when the chain is deeper than [`MAX_PARENT_DEPTH`], or when any lookup
/// fails; lookup errors are logged and otherwise swallowed.
pub fn windows_parent_process_name(tree: &dyn ProcessTree) -> Option<String> {
    let mut pid = match tree.current_pid() {
        Ok(pid) => pid,
        Err(error) => {
            debug!(target: "relaycode.cmd_runner", %error, "parent process lookup failed");
            return None;
        }
    };

    for _ in 0..MAX_PARENT_DEPTH {
        let parent = match tree.parent_of(pid) {
            Ok(Some(parent)) => parent,
            Ok(None) => return None,
            Err(error) => {
                debug!(target: "relaycode.cmd_runner", %error, "parent process lookup failed");
                return None;
            }
        };

        let name = parent.name.to_lowercase();
        if KNOWN_PARENT_SHELLS.contains(&name.as_str()) {
            return Some(name);
        }
        pid = parent.pid;
    }

    None
}

/// [`windows_parent_process_name`] against the live process table.
pub fn get_windows_parent_process_name() -> Option<String> {
    windows_parent_process_name(&SystemProcessTree::snapshot())
}
