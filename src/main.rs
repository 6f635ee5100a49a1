use adorno::Interpreter;
use adorno::env::{DEFAULT_SHELL_NAME, Environment};
use adorno::external::ProcessLauncher;
use adorno::io_adapters::{BufferedLines, EditorLines, LineSource};
use anyhow::Context;
use argh::FromArgs;

#[derive(FromArgs)]
/// Interactive command interpreter with a handful of directory and editor shorthands.
/// Type `help` at the prompt for the list of builtins.
struct Options {
    #[argh(option, default = "DEFAULT_SHELL_NAME.to_string()")]
    /// name shown in the prompt and the welcome banner
    name: String,

    #[argh(switch, short = 'q')]
    /// do not print the welcome banner
    quiet: bool,

    #[argh(switch)]
    /// read input through an interactive line editor instead of plain stdin
    line_editor: bool,

    #[argh(switch, short = 'v')]
    /// log dispatch and process lifecycle events to stderr
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();

    let default_filter = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let sh = Interpreter::new(Environment::new(options.name), ProcessLauncher);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    if !options.quiet {
        sh.intro(&mut stdout)?;
    }

    let mut lines: Box<dyn LineSource> = if options.line_editor {
        Box::new(EditorLines::new().context("cannot start line editor")?)
    } else {
        Box::new(BufferedLines::new(std::io::stdin().lock(), std::io::stdout()))
    };

    sh.repl(lines.as_mut(), &mut stdout, &mut stderr)
}
