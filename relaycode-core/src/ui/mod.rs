//! User-facing interaction: confirmation prompts, the external editor, and
//! error/output reporting.

pub mod editor;
mod interaction;
mod terminal;

pub use editor::EditorLauncher;
pub use interaction::{ConfirmResponse, UserInteraction};
pub use terminal::TerminalInteraction;
