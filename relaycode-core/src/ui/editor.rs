//! External editor launching for revising text.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use editor_command::Editor;
use tempfile::NamedTempFile;
use tracing::debug;

/// Opens text in the user's editor.
///
/// Editor resolution order: the configured `preferred_editor`, then
/// `VISUAL`/`EDITOR`, then the first common editor found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct EditorLauncher {
    preferred_editor: Option<String>,
}

impl EditorLauncher {
    pub fn new(preferred_editor: Option<String>) -> Self {
        let preferred_editor = preferred_editor
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);
        Self { preferred_editor }
    }

    /// Write `text` to a temporary file, wait for the editor to exit and
    /// return the file's new contents.
    pub fn edit_text(&self, text: &str) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("relaycode-")
            .suffix(".md")
            .tempfile()
            .context("failed to create temporary file for editing")?;
        file.write_all(text.as_bytes())
            .context("failed to write temporary file for editing")?;
        file.flush()
            .context("failed to write temporary file for editing")?;

        self.open(&file)?;

        fs::read_to_string(file.path()).context("failed to read edited content from temporary file")
    }

    fn open(&self, file: &NamedTempFile) -> Result<()> {
        let file_path = file.path();
        debug!(target: "relaycode.ui", "launching editor with file: {:?}", file_path);

        let mut cmd = if let Some(preferred) = self.preferred_editor.as_deref() {
            debug!(target: "relaycode.ui", "using configured preferred editor command: {}", preferred);
            build_editor_command_from_string(preferred, file_path).with_context(|| {
                format!("failed to parse editor.preferred_editor '{preferred}'")
            })?
        } else {
            match Editor::new() {
                Ok(editor) => editor.open(file_path),
                Err(_) => {
                    debug!(target: "relaycode.ui", "EDITOR/VISUAL not set, searching for available editors");
                    try_common_editors(file_path).context(
                        "failed to detect editor: set editor.preferred_editor, \
                         or set EDITOR/VISUAL, or install an editor in PATH",
                    )?
                }
            }
        };

        let status = cmd.status().context("failed to spawn editor")?;
        if !status.success() {
            return Err(anyhow!(
                "editor exited with non-zero status: {}",
                status.code().unwrap_or(-1)
            ));
        }
        Ok(())
    }
}

fn build_editor_command_from_string(command: &str, file_path: &Path) -> Result<Command> {
    let tokens =
        shell_words::split(command).with_context(|| format!("invalid editor command: {command}"))?;
    let (program, args) = tokens
        .split_first()
        .ok_or_else(|| anyhow!("editor command cannot be empty"))?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.arg(file_path);
    Ok(cmd)
}

/// Terminal editors first: the request is edited inline in the session.
fn try_common_editors(file_path: &Path) -> Result<Command> {
    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &["code --wait", "notepad++", "notepad"]
    } else {
        &["nvim", "vim", "vi", "nano", "emacs", "code --wait", "zed --wait"]
    };

    for candidate in candidates {
        let Ok(tokens) = shell_words::split(candidate) else {
            continue;
        };
        let Some(program) = tokens.first() else {
            continue;
        };
        if which::which(program).is_ok() {
            debug!(target: "relaycode.ui", "found fallback editor: {}", candidate);
            return build_editor_command_from_string(candidate, file_path);
        }
    }

    Err(anyhow!(
        "no editor found in PATH. Install an editor (e.g. nvim, vim, nano), \
         or configure editor.preferred_editor"
    ))
}
