use crate::error::ShellError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Source of input lines for the interactive loop.
pub trait LineSource {
    /// Show `prompt` and block until a full line is available.
    ///
    /// Returns `Ok(None)` at end of input. A line that cannot be decoded is consumed
    /// and reported as a [`ShellError`], after which reading can carry on.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Plain blocking reader: writes the prompt, then reads up to the next newline
/// with no length limit.
pub struct BufferedLines<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> BufferedLines<R, W> {
    /// Read lines from `input`, writing prompts to `prompt_out`.
    pub fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for BufferedLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8(line).map_err(ShellError::from)?;
        Ok(Some(line))
    }
}

/// Line-editor backed reader, used with `--line-editor`.
///
/// No history is recorded. An interrupt at the prompt yields an empty line so the
/// loop simply prompts again.
pub struct EditorLines {
    editor: DefaultEditor,
}

impl EditorLines {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorLines {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
