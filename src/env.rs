use std::env as stdenv;
use std::path::Path;

/// Name shown in the prompt and banner when none is configured.
pub const DEFAULT_SHELL_NAME: &str = "adorno";

/// User-level view of the shell state that survives between loop iterations.
///
/// The working directory itself is process-wide state owned by the OS: it is
/// changed by the directory builtins through `chdir` and read back here only
/// when the prompt is rendered.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Shell name shown as the first half of the prompt.
    pub shell_name: String,
}

impl Environment {
    /// Create an environment whose prompt and banner use `shell_name`.
    pub fn new(shell_name: impl Into<String>) -> Self {
        Self {
            shell_name: shell_name.into(),
        }
    }

    /// Render `<shell-name>::<cwd-tail>> ` for the current working directory.
    pub fn prompt(&self) -> String {
        let tail = match stdenv::current_dir() {
            Ok(dir) => cwd_tail(&dir),
            Err(e) => {
                log::warn!("cannot read current directory: {e}");
                String::from("?")
            }
        };
        format!("{}::{}> ", self.shell_name, tail)
    }

    /// Greeting printed once before the first prompt.
    pub fn intro(&self) -> String {
        format!(
            "Welcome to the {} shell. Type 'help' for a list of commands.",
            self.shell_name
        )
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL_NAME)
    }
}

/// Last component of `dir`, or the root indicator when `dir` has none.
pub fn cwd_tail(dir: &Path) -> String {
    match dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => String::from("/"),
    }
}
