use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod config;
mod delegate;
mod run;

pub use config::handle_config_command;
pub use delegate::{DelegateCommandOptions, handle_delegate_command};
pub use run::{RunCommandOptions, handle_run_command};

#[derive(Debug, Parser)]
#[command(
    name = "relaycode",
    about = "Hand edit requests to an agent crew and run shell commands with captured output",
    version
)]
pub struct Cli {
    /// Workspace whose configuration is loaded (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Load exactly this configuration file instead of the layered lookup
    #[arg(long, global = true, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a shell command, echoing its output live; exits with the command's code
    Run {
        /// Print which strategy and shell are used
        #[arg(short, long)]
        verbose: bool,

        /// Working directory for the command
        #[arg(long, value_name = "DIR")]
        cwd: Option<PathBuf>,

        /// The command. A single argument is passed to the shell untouched.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Delegate an edit request to the crew and print the edits it would apply
    Delegate {
        /// Proceed without waiting for confirmation
        #[arg(long)]
        auto_accept: bool,

        /// Offer to revise the request in an editor before delegating
        #[arg(long)]
        tweak: bool,

        /// Show the editor coder's announcements
        #[arg(short, long)]
        verbose: bool,

        /// The edit request; read from stdin when omitted
        text: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}
