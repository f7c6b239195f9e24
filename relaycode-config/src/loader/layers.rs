use std::path::{Path, PathBuf};

use toml::Value as TomlValue;

/// Source of a configuration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration (e.g., ~/.relaycode/relaycode.toml)
    User { file: PathBuf },
    /// Workspace config directory (e.g., .relaycode/relaycode.toml)
    WorkspaceDir { file: PathBuf },
    /// Workspace root (relaycode.toml next to the sources)
    Workspace { file: PathBuf },
    /// A file named explicitly through the environment
    Explicit { file: PathBuf },
}

impl ConfigLayerSource {
    pub fn file(&self) -> &Path {
        match self {
            Self::User { file }
            | Self::WorkspaceDir { file }
            | Self::Workspace { file }
            | Self::Explicit { file } => file,
        }
    }
}

/// A single layer of configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayerEntry {
    pub source: ConfigLayerSource,
    pub config: TomlValue,
}

impl ConfigLayerEntry {
    pub fn new(source: ConfigLayerSource, config: TomlValue) -> Self {
        Self { source, config }
    }
}

/// A stack of configuration layers, ordered from lowest to highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayerStack {
    layers: Vec<ConfigLayerEntry>,
}

impl ConfigLayerStack {
    pub fn push(&mut self, layer: ConfigLayerEntry) {
        self.layers.push(layer);
    }

    /// Merge all layers into a single effective configuration.
    pub fn effective_config(&self) -> TomlValue {
        let mut merged = toml::Table::new();
        for layer in &self.layers {
            if let TomlValue::Table(table) = &layer.config {
                overlay_table(&mut merged, table);
            }
        }
        TomlValue::Table(merged)
    }

    pub fn layers(&self) -> &[ConfigLayerEntry] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Lay `upper` over `lower`: nested tables merge key by key, any other value
/// replaces what was there.
fn overlay_table(lower: &mut toml::Table, upper: &toml::Table) {
    for (key, value) in upper {
        match (lower.get_mut(key), value) {
            (Some(TomlValue::Table(existing)), TomlValue::Table(nested)) => {
                overlay_table(existing, nested);
            }
            _ => {
                lower.insert(key.clone(), value.clone());
            }
        }
    }
}
