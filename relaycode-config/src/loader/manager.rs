use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::constants::{defaults, env};
use crate::loader::config::RelayConfig;
use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource, ConfigLayerStack};

/// Configuration manager for loading and validating configurations
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: RelayConfig,
    config_path: Option<PathBuf>,
    layer_stack: ConfigLayerStack,
}

impl ConfigManager {
    /// Load configuration from the default locations.
    ///
    /// `RELAYCODE_CONFIG_PATH` names a single file and wins over discovery;
    /// `RELAYCODE_WORKSPACE` replaces the current directory as the workspace.
    pub fn load() -> Result<Self> {
        if let Ok(config_path) = std::env::var(env::CONFIG_PATH) {
            let trimmed = config_path.trim();
            if !trimmed.is_empty() {
                return Self::load_from_file(trimmed).with_context(|| {
                    format!(
                        "Failed to load configuration from {}={}",
                        env::CONFIG_PATH,
                        trimmed
                    )
                });
            }
        }

        if let Ok(workspace_path) = std::env::var(env::WORKSPACE) {
            let trimmed = workspace_path.trim();
            if !trimmed.is_empty() {
                return Self::load_from_workspace(trimmed).with_context(|| {
                    format!(
                        "Failed to load configuration from {}={}",
                        env::WORKSPACE,
                        trimmed
                    )
                });
            }
        }

        let current_dir =
            std::env::current_dir().context("Failed to resolve the current directory")?;
        Self::load_from_workspace(current_dir)
    }

    /// Load configuration from a specific workspace, including the user's
    /// home configuration.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        Self::load_layered(workspace.as_ref(), dirs::home_dir().as_deref())
    }

    /// Load configuration from a workspace with an explicit home directory.
    ///
    /// Layers, lowest precedence first:
    /// 1. `<home>/.relaycode/relaycode.toml`
    /// 2. `<workspace>/.relaycode/relaycode.toml`
    /// 3. `<workspace>/relaycode.toml`
    pub fn load_layered(workspace: &Path, home: Option<&Path>) -> Result<Self> {
        let mut layer_stack = ConfigLayerStack::default();

        if let Some(home) = home {
            let user_config = home
                .join(defaults::CONFIG_DIR_NAME)
                .join(defaults::CONFIG_FILE_NAME);
            Self::push_layer_if_present(
                &mut layer_stack,
                ConfigLayerSource::User { file: user_config },
            )?;
        }

        let dir_config = workspace
            .join(defaults::CONFIG_DIR_NAME)
            .join(defaults::CONFIG_FILE_NAME);
        Self::push_layer_if_present(
            &mut layer_stack,
            ConfigLayerSource::WorkspaceDir { file: dir_config },
        )?;

        let workspace_config = workspace.join(defaults::CONFIG_FILE_NAME);
        Self::push_layer_if_present(
            &mut layer_stack,
            ConfigLayerSource::Workspace {
                file: workspace_config,
            },
        )?;

        Self::from_layers(layer_stack)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let toml = Self::load_toml_from_file(path)?;
        let mut layer_stack = ConfigLayerStack::default();
        layer_stack.push(ConfigLayerEntry::new(
            ConfigLayerSource::Explicit {
                file: path.to_path_buf(),
            },
            toml,
        ));
        Self::from_layers(layer_stack)
    }

    fn push_layer_if_present(stack: &mut ConfigLayerStack, source: ConfigLayerSource) -> Result<()> {
        let file = source.file();
        if !file.exists() {
            return Ok(());
        }
        let toml = Self::load_toml_from_file(file)?;
        debug!(
            target: "relaycode.config",
            file = %file.display(),
            "loaded configuration layer"
        );
        stack.push(ConfigLayerEntry::new(source, toml));
        Ok(())
    }

    fn from_layers(layer_stack: ConfigLayerStack) -> Result<Self> {
        if layer_stack.is_empty() {
            let config = RelayConfig::default();
            config
                .validate()
                .context("Default configuration failed validation")?;
            return Ok(Self {
                config,
                config_path: None,
                layer_stack,
            });
        }

        let config: RelayConfig = layer_stack
            .effective_config()
            .try_into()
            .context("Failed to deserialize effective configuration")?;
        config
            .validate()
            .context("Configuration failed validation")?;

        let config_path = layer_stack
            .layers()
            .last()
            .map(|layer| layer.source.file().to_path_buf());

        Ok(Self {
            config,
            config_path,
            layer_stack,
        })
    }

    fn load_toml_from_file(path: &Path) -> Result<toml::Value> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: toml::Value = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(value)
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn into_config(self) -> RelayConfig {
        self.config
    }

    /// Highest-precedence file that contributed to the configuration.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn layer_stack(&self) -> &ConfigLayerStack {
        &self.layer_stack
    }
}
