//! # relaycode-core
//!
//! The delegated-edit coder and the contracts it talks through.
//!
//! - `coder/`: [`DelegatedEditCoder`], which hands a finished response to an
//!   agent crew and replays the crew's output through a secondary editor
//!   coder, plus the crew, factory and history types around it.
//! - `ui/`: the [`UserInteraction`] seam and its terminal implementation
//!   (dialoguer prompts, external editor).

pub mod coder;
pub mod ui;

pub use coder::{
    APPLIED_NOTE, ASSISTANT_ACK, CONFIRM_PROMPT, ChatMessage, CoderArgs, CoderConfig,
    CoderFactory, CoderLineage, CrewClient, CrewError, CrewIdentity, CrewProvider,
    DELEGATED_EDIT_FORMAT, DelegatedEditCoder, DelegationSettings, DryRunCoder,
    DryRunCoderFactory, EditorCoder, MessageRole, ModelSettings, NULL_CREW_OUTPUT, NullCrew,
    ReplyOutcome, SwitchCoder,
};
pub use ui::{ConfirmResponse, EditorLauncher, TerminalInteraction, UserInteraction};
