/// Default values shared by the config sections and the loader.
pub mod defaults {
    pub const CONFIG_FILE_NAME: &str = "relaycode.toml";
    pub const CONFIG_DIR_NAME: &str = ".relaycode";

    pub const MODEL: &str = "gpt-4o";
    pub const EDITOR_EDIT_FORMAT: &str = "editor-diff";
    pub const RETURN_EDIT_FORMAT: &str = "architect";

    pub const CREW_NAME: &str = "RelayCrew";
    pub const CREW_DESCRIPTION: &str =
        "Orchestrates code analysis, planning, and editing for relaycode.";

    pub const TRACE_TARGETS: &str = concat!(
        "relaycode.cli,relaycode.cmd_runner,relaycode.coder,",
        "relaycode.commons,relaycode.config,relaycode.ui"
    );
}

/// Environment variables consulted by the loader.
pub mod env {
    /// Path to a single config file; skips layered discovery.
    pub const CONFIG_PATH: &str = "RELAYCODE_CONFIG_PATH";
    /// Workspace to discover config files in instead of the current directory.
    pub const WORKSPACE: &str = "RELAYCODE_WORKSPACE";
}
