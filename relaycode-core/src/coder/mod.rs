//! Delegated editing: the crew does the planning, an editor coder applies it.

mod crew;
mod delegated;
mod dry_run;
mod factory;
mod messages;
mod models;
mod switch;

#[cfg(test)]
mod tests;

pub use crew::{CrewClient, CrewError, CrewIdentity, CrewProvider, NULL_CREW_OUTPUT, NullCrew};
pub use delegated::{
    APPLIED_NOTE, ASSISTANT_ACK, CONFIRM_PROMPT, DELEGATED_EDIT_FORMAT, DelegatedEditCoder,
    DelegationSettings,
};
pub use dry_run::{DryRunCoder, DryRunCoderFactory};
pub use factory::{CoderArgs, CoderConfig, CoderFactory, CoderLineage, EditorCoder};
pub use messages::{ChatMessage, MessageRole};
pub use models::ModelSettings;
pub use switch::{ReplyOutcome, SwitchCoder};
