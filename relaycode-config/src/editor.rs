use serde::{Deserialize, Serialize};

/// External editor used for "tweak" answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EditorConfig {
    /// Preferred editor command override (supports args, e.g. `code --wait`).
    /// Takes precedence over VISUAL/EDITOR.
    #[serde(default)]
    pub preferred_editor: Option<String>,
}

impl EditorConfig {
    pub fn preferred_editor(&self) -> Option<&str> {
        self.preferred_editor
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}
