/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Exit code of the shell after `exit` or end of input.
pub const SUCCESS: ExitCode = 0;

/// Exit code of the shell when the token buffer cannot grow.
pub const ALLOCATION_FAILURE: ExitCode = 1;

/// Exit code of a forked child whose program image could not be replaced.
///
/// Only ever used by the child; the shell itself never exits with it.
pub const EXEC_FAILURE: ExitCode = 2;

/// Signal returned by every dispatched command telling the interactive loop
/// whether to read another line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContinuationStatus {
    /// Keep prompting.
    #[default]
    Continue,
    /// Leave the loop; the process exits with [`SUCCESS`].
    Terminate,
}

impl ContinuationStatus {
    /// Whether the loop should prompt again.
    pub fn is_continue(self) -> bool {
        self == ContinuationStatus::Continue
    }
}
