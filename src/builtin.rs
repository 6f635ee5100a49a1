use crate::command::ContinuationStatus;
use crate::error::{Result, ShellError};
use crate::external::Launcher;
use crate::lexer::ArgVector;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Most of them are shorthands that build a new argument vector for a real program
/// and hand it to the [`Launcher`]; `cd`, `b`, `exit` and `help` are handled
/// in-process. Dispatch is by exact, case-sensitive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Back,
    BackList,
    Clear,
    Cd,
    CdList,
    Emacs,
    Exit,
    Help,
    List,
    Open,
    SublimeText,
    Vi,
}

impl Builtin {
    /// Every builtin, in the order `help` lists them.
    pub const ALL: [Builtin; 12] = [
        Builtin::Back,
        Builtin::BackList,
        Builtin::Clear,
        Builtin::Cd,
        Builtin::CdList,
        Builtin::Emacs,
        Builtin::Exit,
        Builtin::Help,
        Builtin::List,
        Builtin::Open,
        Builtin::SublimeText,
        Builtin::Vi,
    ];

    /// Canonical name of the command, what the user types.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Back => "b",
            Builtin::BackList => "bl",
            Builtin::Clear => "c",
            Builtin::Cd => "cd",
            Builtin::CdList => "cdl",
            Builtin::Emacs => "e",
            Builtin::Exit => "exit",
            Builtin::Help => "help",
            Builtin::List => "l",
            Builtin::Open => "o",
            Builtin::SublimeText => "s",
            Builtin::Vi => "v",
        }
    }

    /// One-line description for `help`.
    pub fn description(self) -> &'static str {
        match self {
            Builtin::Back => "change to the parent directory",
            Builtin::BackList => "change to the parent directory and list directory contents",
            Builtin::Clear => "clear the screen",
            Builtin::Cd => "change directory",
            Builtin::CdList => "change directory and list directory contents",
            Builtin::Emacs => "launch emacs",
            Builtin::Exit => "exit shell",
            Builtin::Help => "display help",
            Builtin::List => "list directory contents",
            Builtin::Open => "open file",
            Builtin::SublimeText => "launch sublime text 2",
            Builtin::Vi => "launch vi",
        }
    }

    /// Find the builtin called `name`, if any.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Run the builtin and report its own errors on `stderr`.
    ///
    /// Only `exit` terminates the loop; every other builtin continues even when it
    /// fails.
    pub fn execute(
        self,
        argv: &ArgVector,
        launcher: &dyn Launcher,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ContinuationStatus {
        match self.run(argv, launcher, stdout, stderr) {
            Ok(status) => status,
            Err(e) => {
                log::debug!("builtin {} failed: {e}", self.name());
                let _ = writeln!(stderr, "{e}");
                ContinuationStatus::Continue
            }
        }
    }

    fn run(
        self,
        argv: &ArgVector,
        launcher: &dyn Launcher,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ContinuationStatus> {
        let status = match self {
            Builtin::Back => {
                change_dir("..")?;
                ContinuationStatus::Continue
            }
            Builtin::BackList => {
                report(change_dir(".."), stderr);
                delegate(launcher, ArgVector::new("ls", NO_ARGS), stderr)
            }
            Builtin::Clear => delegate(launcher, rewrite("clear", argv), stderr),
            Builtin::Cd => {
                change_dir(required_operand(argv)?)?;
                ContinuationStatus::Continue
            }
            Builtin::CdList => {
                report(required_operand(argv).and_then(change_dir), stderr);
                delegate(launcher, ArgVector::new("ls", NO_ARGS), stderr)
            }
            Builtin::Emacs => {
                required_operand(argv)?;
                delegate(launcher, rewrite("emacs", argv), stderr)
            }
            Builtin::Exit => ContinuationStatus::Terminate,
            Builtin::Help => {
                for builtin in Builtin::ALL {
                    writeln!(stdout, "\t{}\t{}", builtin.name(), builtin.description())?;
                }
                ContinuationStatus::Continue
            }
            Builtin::List => delegate(launcher, rewrite("ls", argv), stderr),
            Builtin::Open => delegate(launcher, rewrite("open", argv), stderr),
            Builtin::SublimeText => {
                let file = required_operand(argv)?;
                let open = ArgVector::new("open", [file, "-a", "sublime text 2"]);
                delegate(launcher, open, stderr)
            }
            Builtin::Vi => {
                required_operand(argv)?;
                delegate(launcher, rewrite("vi", argv), stderr)
            }
        };
        Ok(status)
    }
}

const NO_ARGS: [&str; 0] = [];

/// Same arguments, different program.
fn rewrite(program: &str, argv: &ArgVector) -> ArgVector {
    ArgVector::new(program, argv.args().iter().map(String::as_str))
}

fn delegate(
    launcher: &dyn Launcher,
    argv: ArgVector,
    stderr: &mut dyn Write,
) -> ContinuationStatus {
    log::debug!("delegating to {:?}", argv);
    launcher.launch(&argv, stderr)
}

fn required_operand(argv: &ArgVector) -> Result<&str> {
    argv.get(1).ok_or(ShellError::MissingArgument)
}

fn change_dir(dir: &str) -> Result<()> {
    nix::unistd::chdir(dir)?;
    log::debug!("changed directory to {dir}");
    Ok(())
}

/// Print a failed step of a compound builtin and carry on with the next one.
fn report(result: Result<()>, stderr: &mut dyn Write) {
    if let Err(e) = result {
        let _ = writeln!(stderr, "{e}");
    }
}
