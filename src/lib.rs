//! A small interactive command interpreter.
//!
//! Lines are read from standard input, split on whitespace into an argument vector and
//! dispatched either to a builtin from a fixed table or to an external program, which is
//! forked, exec'd and waited for synchronously. There are no pipelines, redirections,
//! variables or background jobs.
//!
//! The main entry point is [`Interpreter`]. The public modules [`lexer`], [`builtin`]
//! and [`external`] expose the tokenizer, the builtin table and the process launcher on
//! their own.

pub mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
#[cfg(test)]
mod testsupport;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

pub use command::ContinuationStatus;
