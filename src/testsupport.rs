//! Shared helpers for unit tests.

use crate::command::ContinuationStatus;
use crate::external::Launcher;
use crate::lexer::ArgVector;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Serialises tests that read or change the process working directory.
pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores the working directory it was created in when dropped.
pub(crate) struct CwdGuard {
    saved: PathBuf,
}

impl CwdGuard {
    pub(crate) fn new() -> Self {
        Self {
            saved: std::env::current_dir().expect("cwd"),
        }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.saved);
    }
}

/// Fresh, empty directory under the system temp dir.
pub(crate) fn make_unique_temp_dir(tag: &str) -> io::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!(
        "adorno_{tag}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir)?;
    // Canonical form so comparisons with current_dir() hold on symlinked temp dirs.
    std::fs::canonicalize(dir)
}

/// Launcher that records what it was asked to run instead of forking.
#[derive(Default)]
pub(crate) struct RecordingLauncher {
    pub(crate) launched: RefCell<Vec<ArgVector>>,
}

impl RecordingLauncher {
    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.launched
            .borrow()
            .iter()
            .map(|argv| argv.iter().cloned().collect())
            .collect()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, argv: &ArgVector, _stderr: &mut dyn Write) -> ContinuationStatus {
        self.launched.borrow_mut().push(argv.clone());
        ContinuationStatus::Continue
    }
}
