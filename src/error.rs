//! Recoverable errors reported on the diagnostic stream.
//!
//! None of these stop the interactive loop: the dispatcher prints them and
//! asks for the next line. Allocation failure in the tokenizer is not part of
//! this taxonomy, it ends the process (see [`crate::lexer`]).

use nix::errno::Errno;
use std::io;

/// Errors produced while running a builtin or launching a program.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// A builtin that needs an operand was called without one.
    #[error("Expected another argument.")]
    MissingArgument,

    /// A system call failed; rendered the way `perror("shell")` would.
    #[error("shell: {}", .0.desc())]
    Os(#[from] Errno),

    #[error("shell: {0}")]
    Io(#[from] io::Error),

    /// A token cannot be handed to `execvp` because it contains a NUL byte.
    #[error("shell: argument contains an interior NUL byte")]
    InteriorNul(#[from] std::ffi::NulError),

    #[error("shell: empty command")]
    EmptyCommand,

    /// An input line could not be decoded; the line is skipped.
    #[error("shell: input line is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
