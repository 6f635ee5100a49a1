use crate::command::{ContinuationStatus, EXEC_FAILURE, ExitCode};
use crate::error::{Result, ShellError};
use crate::lexer::ArgVector;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::{CStr, CString};
use std::io::Write;

/// Runs a command that is not a builtin.
///
/// Implementations must always hand control back to the loop: whatever happens to
/// the program, the result is [`ContinuationStatus::Continue`]. Failures are written
/// to `stderr` rather than returned.
pub trait Launcher {
    fn launch(&self, argv: &ArgVector, stderr: &mut dyn Write) -> ContinuationStatus;
}

/// How a launched child left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The child called `exit` with this status.
    Exited(ExitCode),
    /// The child was killed by a signal.
    Signaled(Signal),
}

impl LaunchOutcome {
    /// Shell-style status: the exit code, or 128 + signal number.
    pub fn code(self) -> ExitCode {
        match self {
            LaunchOutcome::Exited(code) => code,
            LaunchOutcome::Signaled(signal) => 128 + signal as i32,
        }
    }
}

/// Launcher that forks, replaces the child image with `execvp` and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    /// Fork and exec `argv`, blocking until the child has exited or been killed.
    ///
    /// `argv[0]` is looked up in `PATH` by `execvp`. A child that cannot exec prints
    /// `shell: <reason>` and exits with [`EXEC_FAILURE`], which shows up here as
    /// `Exited(EXEC_FAILURE)`; only a failed `fork` or `waitpid` is an `Err`.
    pub fn run(&self, argv: &ArgVector) -> Result<LaunchOutcome> {
        // Built before forking so the child never touches the allocator.
        let c_args = argv.to_c_args()?;
        let program = c_args.first().ok_or(ShellError::EmptyCommand)?;

        // SAFETY: the shell is single-threaded, and the child only calls execvp,
        // write and _exit before its image is replaced or it terminates. _exit skips
        // atexit handlers and stdio flushing, so nothing inherited from the parent runs.
        match unsafe { unistd::fork() }? {
            ForkResult::Child => exec_child(program, &c_args),
            ForkResult::Parent { child } => {
                log::debug!("forked {child} for {:?}", argv.command());
                wait_for_exit(child)
            }
        }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, argv: &ArgVector, stderr: &mut dyn Write) -> ContinuationStatus {
        match self.run(argv) {
            Ok(outcome) => {
                log::debug!(
                    "{:?} finished: {outcome:?} (status {})",
                    argv.command(),
                    outcome.code()
                );
            }
            Err(e) => {
                log::warn!("launch of {:?} failed: {e}", argv.command());
                let _ = writeln!(stderr, "{e}");
            }
        }
        ContinuationStatus::Continue
    }
}

/// Child side of the fork. Never returns into parent-side logic.
fn exec_child(program: &CStr, args: &[CString]) -> ! {
    let errno = match unistd::execvp(program, args) {
        Ok(never) => match never {},
        Err(errno) => errno,
    };
    for part in [b"shell: ".as_slice(), errno.desc().as_bytes(), b"\n".as_slice()] {
        let _ = unistd::write(std::io::stderr(), part);
    }
    // SAFETY: _exit only terminates the calling process.
    unsafe { nix::libc::_exit(EXEC_FAILURE) }
}

/// Wait until `child` has exited or been killed; stop notifications keep the wait going.
fn wait_for_exit(child: Pid) -> Result<LaunchOutcome> {
    loop {
        match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(LaunchOutcome::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, core_dumped)) => {
                if core_dumped {
                    log::debug!("{child} dumped core");
                }
                return Ok(LaunchOutcome::Signaled(signal));
            }
            Ok(status) => {
                log::debug!("{child} changed state without exiting: {status:?}");
            }
            Err(Errno::EINTR) => {}
            Err(e) => return Err(e.into()),
        }
    }
}
