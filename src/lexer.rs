//! A module implementing lexical analysis (tokenization) of an input line into an
//! argument vector.
//!
//! The grammar is deliberately flat: tokens are maximal runs of characters that are
//! not in [`TOKEN_DELIMITERS`]. There is no quoting, escaping or substitution.

use crate::command::ALLOCATION_FAILURE;
use std::collections::TryReserveError;
use std::ffi::CString;
use std::ops::Index;

/// Characters that separate tokens: space, tab, carriage return, newline and bell.
pub const TOKEN_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\u{7}'];

/// Initial token capacity, and the amount the buffer grows by each time it fills up.
pub const TOKEN_CAPACITY_STEP: usize = 64;

/// Parsed command name plus its arguments, in input order.
///
/// Index 0 is the command name. The end of the vector is the terminator: nothing
/// past [`ArgVector::len`] is ever observed, and [`ArgVector::to_c_args`] produces
/// exactly `len` C strings for `execvp`, which appends the trailing null itself.
/// An empty vector stands for a blank input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgVector {
    tokens: Vec<String>,
}

impl ArgVector {
    /// Build a vector for a rewritten command: `program` followed by `args`.
    ///
    /// Delegating builtins use this so that every forwarded vector is freshly sized
    /// and carries no stale trailing elements.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = vec![program.into()];
        tokens.extend(args.into_iter().map(Into::into));
        Self { tokens }
    }

    /// The command name, or `None` for a blank line.
    pub fn command(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    /// Token at `index`, `None` past the terminator.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Number of tokens, command name included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True for a blank line: the terminator is the first element.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens the vector can hold before it has to grow again.
    pub fn capacity(&self) -> usize {
        self.tokens.capacity()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tokens.iter()
    }

    /// Convert to the C argument list handed to `execvp`.
    pub fn to_c_args(&self) -> Result<Vec<CString>, std::ffi::NulError> {
        self.tokens
            .iter()
            .map(|t| CString::new(t.as_bytes()))
            .collect()
    }
}

impl Index<usize> for ArgVector {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a ArgVector {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Split `line` into an argument vector, reporting allocation failure to the caller.
///
/// Storage starts at [`TOKEN_CAPACITY_STEP`] slots and grows by another
/// [`TOKEN_CAPACITY_STEP`] whenever the token count reaches capacity. Consecutive
/// delimiters collapse, so no empty tokens are produced.
pub fn try_split_into_tokens(line: &str) -> Result<ArgVector, TryReserveError> {
    let mut tokens: Vec<String> = Vec::new();
    tokens.try_reserve_exact(TOKEN_CAPACITY_STEP)?;

    for token in line.split(TOKEN_DELIMITERS).filter(|t| !t.is_empty()) {
        if tokens.len() >= tokens.capacity() {
            tokens.try_reserve_exact(TOKEN_CAPACITY_STEP)?;
            log::trace!("token buffer grown to {}", tokens.capacity());
        }
        tokens.push(token.to_owned());
    }

    Ok(ArgVector { tokens })
}

/// The main entry point to perform lexical analysis.
///
/// Running out of memory while growing the token buffer is fatal: the message
/// `Allocation error` goes to stderr and the process exits with
/// [`ALLOCATION_FAILURE`]. Continuing without the requested memory is not an option
/// the shell offers.
pub fn split_into_tokens(line: &str) -> ArgVector {
    match try_split_into_tokens(line) {
        Ok(argv) => argv,
        Err(e) => {
            log::error!("token buffer allocation failed: {e}");
            eprintln!("Allocation error");
            std::process::exit(ALLOCATION_FAILURE)
        }
    }
}
