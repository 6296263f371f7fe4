//! Append-only job log files.
//!
//! Each job reports into its own file under the configured log directory.
//! The file is opened in append mode for every write, so overlapping
//! invocations (a slow run overtaken by the next scheduled one) interleave
//! whole entries instead of clobbering each other.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One job's append-only log file.
#[derive(Debug, Clone)]
pub struct JobLogFile {
    path: PathBuf,
}

impl JobLogFile {
    /// A log file named `name` under `dir`.
    #[must_use]
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(name),
        }
    }

    /// The file's full path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from opening or writing the file.
    pub fn append_line(&self, line: &str) -> std::io::Result<()> {
        self.append(&format!("{line}\n"))
    }

    /// Appends `text` verbatim, creating the file if missing.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from opening or writing the file.
    pub fn append(&self, text: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())
    }
}
