//! Shared traits and helper types reused across the relaycode crates. The
//! command runner and the delegated-edit coder both surface failures as short
//! user-facing messages; this crate holds the contract they report through so
//! neither depends on the CLI presentation layer.

pub mod errors;
pub mod reference;

pub use errors::{ErrorReporter, NoopErrorReporter, StdoutErrorReporter};
pub use reference::MemoryErrorReporter;
