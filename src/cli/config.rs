use anyhow::Result;
use relaycode_config::ConfigManager;

/// Print the effective configuration, preceded by the files it came from as
/// TOML comments.
pub fn handle_config_command(manager: &ConfigManager) -> Result<()> {
    let layers = manager.layer_stack().layers();
    if layers.is_empty() {
        println!("# No configuration files found; showing defaults");
    }
    for layer in layers {
        println!("# Loaded from {}", layer.source.file().display());
    }
    print!("{}", manager.config().to_toml_string()?);
    Ok(())
}
