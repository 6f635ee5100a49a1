use crate::builtin::Builtin;
use crate::command::ContinuationStatus;
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::{Launcher, ProcessLauncher};
use crate::io_adapters::LineSource;
use crate::lexer::{self, ArgVector};
use std::io::Write;

/// A minimal interactive interpreter that executes built-in and external commands.
///
/// Each input line is split into an [`ArgVector`], then dispatched: a blank line is
/// ignored, a name from the builtin table runs in-process, and anything else goes to
/// the [`Launcher`]. The loop ends when a command answers
/// [`ContinuationStatus::Terminate`] or input runs out.
///
/// Example
/// ```
/// use adorno::{ContinuationStatus, Interpreter, lexer};
/// let sh: Interpreter = Interpreter::default();
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let status = sh.execute(&lexer::split_into_tokens("exit"), &mut out, &mut err);
/// assert_eq!(status, ContinuationStatus::Terminate);
/// ```
pub struct Interpreter<L = ProcessLauncher> {
    env: Environment,
    launcher: L,
}

impl<L: Launcher> Interpreter<L> {
    /// Create an interpreter that runs external commands through `launcher`.
    pub fn new(env: Environment, launcher: L) -> Self {
        Self { env, launcher }
    }

    /// The launcher external commands are handed to.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Dispatch one parsed line.
    pub fn execute(
        &self,
        argv: &ArgVector,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ContinuationStatus {
        let Some(name) = argv.command() else {
            return ContinuationStatus::Continue;
        };

        match Builtin::lookup(name) {
            Some(builtin) => {
                log::debug!("dispatching {name:?} to builtin {builtin:?}");
                builtin.execute(argv, &self.launcher, stdout, stderr)
            }
            None => {
                log::debug!("dispatching {name:?} to launcher");
                // The child shares our stdout; anything buffered must land first.
                let _ = stdout.flush();
                self.launcher.launch(argv, stderr)
            }
        }
    }

    /// Tokenize and dispatch a raw input line.
    pub fn execute_line(
        &self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ContinuationStatus {
        let argv = lexer::split_into_tokens(line);
        self.execute(&argv, stdout, stderr)
    }

    /// Read-parse-dispatch until `exit` or end of input.
    ///
    /// A line that cannot be decoded is reported on `stderr` and skipped. Other errors
    /// reading input or writing the prompt end the loop and are returned; command
    /// failures never are.
    pub fn repl(
        &self,
        lines: &mut dyn LineSource,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> anyhow::Result<()> {
        loop {
            let prompt = self.env.prompt();
            let line = match lines.read_line(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    log::debug!("end of input");
                    break;
                }
                Err(e) => match e.downcast::<ShellError>() {
                    Ok(skipped) => {
                        writeln!(stderr, "{skipped}")?;
                        continue;
                    }
                    Err(e) => return Err(e),
                },
            };

            let status = self.execute_line(&line, stdout, stderr);
            stdout.flush()?;
            if !status.is_continue() {
                log::debug!("exit requested");
                break;
            }
        }
        Ok(())
    }

    /// Print the welcome banner.
    pub fn intro(&self, stdout: &mut dyn Write) -> std::io::Result<()> {
        writeln!(stdout, "{}", self.env.intro())
    }
}

impl Default for Interpreter {
    /// Create an interpreter named `adorno` that forks real processes.
    fn default() -> Self {
        Self::new(Environment::default(), ProcessLauncher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::BufferedLines;
    use crate::testsupport::{CwdGuard, RecordingLauncher, lock_current_dir};
    use std::io::Cursor;

    fn recording() -> Interpreter<RecordingLauncher> {
        Interpreter::new(Environment::new("adorno"), RecordingLauncher::default())
    }

    struct Session {
        prompts: String,
        stdout: String,
        stderr: String,
    }

    fn session<L: Launcher>(sh: &Interpreter<L>, input: &str) -> Session {
        let mut prompts = Vec::new();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut lines = BufferedLines::new(Cursor::new(input.to_string()), &mut prompts);
        sh.repl(&mut lines, &mut stdout, &mut stderr).unwrap();
        drop(lines);
        Session {
            prompts: String::from_utf8(prompts).unwrap(),
            stdout: String::from_utf8(stdout).unwrap(),
            stderr: String::from_utf8(stderr).unwrap(),
        }
    }

    #[test]
    fn test_blank_lines_are_no_ops() {
        let sh = recording();
        let mut out = Vec::new();
        let mut err = Vec::new();
        for line in ["", "\n", "  \t \r\n", "\u{7}"] {
            let status = sh.execute_line(line, &mut out, &mut err);
            assert_eq!(status, ContinuationStatus::Continue);
        }
        assert!(out.is_empty());
        assert!(err.is_empty());
        assert!(sh.launcher().calls().is_empty());
    }

    #[test]
    fn test_unknown_command_goes_to_launcher() {
        let sh = recording();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = sh.execute_line("git status --short\n", &mut out, &mut err);
        assert_eq!(status, ContinuationStatus::Continue);
        assert_eq!(
            sh.launcher().calls(),
            vec![vec!["git".to_string(), "status".into(), "--short".into()]]
        );
    }

    #[test]
    fn test_dispatch_resolves_the_same_way_each_time() {
        let sh = recording();
        let mut out = Vec::new();
        let mut err = Vec::new();
        for _ in 0..2 {
            sh.execute_line("l -a", &mut out, &mut err);
            sh.execute_line("make all", &mut out, &mut err);
        }
        let calls = sh.launcher().calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], calls[2]);
        assert_eq!(calls[1], calls[3]);
        assert_eq!(calls[0][0], "ls");
        assert_eq!(calls[1][0], "make");
    }

    #[test]
    fn test_builtin_names_are_case_sensitive() {
        let sh = recording();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = sh.execute_line("EXIT", &mut out, &mut err);
        assert_eq!(status, ContinuationStatus::Continue);
        assert_eq!(sh.launcher().calls(), vec![vec!["EXIT".to_string()]]);
    }

    #[test]
    fn test_exit_ends_session() {
        let _lock = lock_current_dir();
        let sh = recording();
        let s = session(&sh, "exit\nl\n");
        assert_eq!(s.prompts.matches("adorno::").count(), 1);
        assert!(sh.launcher().calls().is_empty(), "nothing after exit runs");
        assert!(s.stderr.is_empty());
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let _lock = lock_current_dir();
        let sh = recording();
        let s = session(&sh, "\n\n");
        assert_eq!(s.prompts.matches("adorno::").count(), 3);
        assert!(s.stdout.is_empty());
        assert!(s.stderr.is_empty());
    }

    #[test]
    fn test_cd_tmp_updates_prompt() {
        let _lock = lock_current_dir();
        let _restore = CwdGuard::new();
        let sh = recording();
        let s = session(&sh, "cd /tmp\nexit\n");
        let prompts: Vec<&str> = s.prompts.split_inclusive("> ").collect();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[1], "adorno::tmp> ");
    }

    #[test]
    fn test_cd_without_argument_keeps_looping() {
        let _lock = lock_current_dir();
        let before = std::env::current_dir().unwrap();
        let sh = recording();
        let s = session(&sh, "cd\nhelp\nexit\n");
        assert_eq!(s.stderr, "Expected another argument.\n");
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert!(s.stdout.starts_with("\tb\tchange to the parent directory\n"));
        assert_eq!(s.prompts.matches("adorno::").count(), 3);
    }

    #[test]
    fn test_root_prompt() {
        let _lock = lock_current_dir();
        let _restore = CwdGuard::new();
        let sh = recording();
        let s = session(&sh, "cd /\n");
        assert!(s.prompts.ends_with("adorno::/> "));
    }

    #[test]
    #[cfg(unix)]
    fn test_missing_program_does_not_stop_the_loop() {
        let _lock = lock_current_dir();
        let sh: Interpreter = Interpreter::default();
        let s = session(&sh, "nonexistentcmd123\ntrue\nexit\n");
        assert_eq!(s.prompts.matches("adorno::").count(), 3);
        // The child writes its diagnostic straight to fd 2, not to our buffer.
        assert!(s.stderr.is_empty());
    }

    #[test]
    fn test_undecodable_line_does_not_stop_the_loop() {
        let _lock = lock_current_dir();
        let sh = recording();
        let mut prompts = Vec::new();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut lines =
            BufferedLines::new(Cursor::new(b"ls \xe9\nl\nexit\n".to_vec()), &mut prompts);
        sh.repl(&mut lines, &mut stdout, &mut stderr).unwrap();
        drop(lines);

        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "shell: input line is not valid UTF-8\n"
        );
        assert_eq!(sh.launcher().calls(), vec![vec!["ls".to_string()]]);
        assert_eq!(String::from_utf8(prompts).unwrap().matches("adorno::").count(), 3);
    }

    #[test]
    fn test_intro() {
        let sh = recording();
        let mut out = Vec::new();
        sh.intro(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Welcome to the adorno shell. Type 'help' for a list of commands.\n"
        );
    }
}
