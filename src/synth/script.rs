//! Location of the generated script
//!
//! The run owns exactly one script location. Each test case overwrites it
//! and the file is removed when the walk is done, or when the owner is
//! dropped on an early exit.

use std::io;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Exclusively owned script file
#[derive(Debug)]
pub struct ScriptFile {
    path: PathBuf,
}

impl ScriptFile {
    /// Take ownership of a script location. Nothing is written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path handed to the replay tool
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents
    pub fn write(&self, contents: &str) -> Result<()> {
        std::fs::write(&self.path, contents).map_err(|e| {
            Error::Synthesis(format!(
                "Failed to write script '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Delete the file. A file that was never written is not an error.
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed generated script");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
