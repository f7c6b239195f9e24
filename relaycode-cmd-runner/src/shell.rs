/// Shell used when `SHELL` is unset.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Shell named by the `SHELL` environment variable, or [`DEFAULT_SHELL`].
pub fn resolve_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SHELL.to_string())
}

/// Remove lines that end with a single backslash used for line continuation.
///
/// A line ending in `\\` is an escaped literal backslash and is kept. The
/// surviving lines are joined with `\n`.
pub fn process_multiline_command(command: &str) -> String {
    command
        .lines()
        .filter(|line| !ends_with_continuation(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn ends_with_continuation(line: &str) -> bool {
    let stripped = line.trim_end();
    stripped.ends_with('\\') && !stripped.ends_with("\\\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    fn drops_line_with_single_trailing_backslash() {
        assert_eq!(process_multiline_command("echo a\\\nb"), "b");
    }

    #[test]
    fn keeps_escaped_backslash() {
        assert_eq!(process_multiline_command("echo a\\\\\nb"), "echo a\\\\\nb");
    }

    #[test]
    fn trailing_whitespace_does_not_hide_continuation() {
        assert_eq!(
            process_multiline_command("ls \\   \n-la\npwd"),
            "-la\npwd"
        );
    }

    #[test]
    fn single_line_is_unchanged() {
        assert_eq!(process_multiline_command("git status"), "git status");
        assert_eq!(process_multiline_command(""), "");
    }

    #[test]
    fn crlf_lines_are_normalised() {
        assert_eq!(process_multiline_command("a\r\nb\r\n"), "a\nb");
    }

    #[test]
    #[serial]
    fn shell_defaults_when_unset() {
        let previous = std::env::var_os("SHELL");
        // SAFETY: serialised with the other environment-mutating tests.
        unsafe {
            std::env::remove_var("SHELL");
        }
        let resolved = resolve_shell();
        unsafe {
            std::env::set_var("SHELL", "/usr/bin/zsh");
        }
        let overridden = resolve_shell();
        unsafe {
            match previous {
                Some(value) => std::env::set_var("SHELL", value),
                None => std::env::remove_var("SHELL"),
            }
        }

        assert_eq!(resolved, DEFAULT_SHELL);
        assert_eq!(overridden, "/usr/bin/zsh");
    }
}
