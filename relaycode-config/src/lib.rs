//! Configuration for relaycode.
//!
//! Settings live in `relaycode.toml`. [`ConfigManager`] discovers the files
//! that apply to a workspace, merges them from lowest to highest precedence
//! and validates the result into a [`RelayConfig`].

pub mod agent;
pub mod constants;
pub mod crew;
pub mod debug;
pub mod editor;
pub mod loader;

pub use agent::AgentConfig;
pub use crew::CrewConfig;
pub use debug::{DebugConfig, TraceLevel};
pub use editor::EditorConfig;
pub use loader::layers::{ConfigLayerEntry, ConfigLayerSource, ConfigLayerStack};
pub use loader::{ConfigManager, RelayConfig};
