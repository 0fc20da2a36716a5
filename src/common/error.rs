//! Error types for the replay harness
//!
//! Only run-level problems are represented here. Anything that goes wrong
//! for a single test case is recorded in the report instead.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the replay harness
#[derive(Error, Debug)]
pub enum Error {
    // === Invocation Errors ===
    #[error("Tests directory '{0}' does not exist or is not a directory")]
    TestsRootMissing(String),

    // === Tool Errors ===
    #[error("Replay tool '{name}' not found. Searched: {searched}")]
    ToolNotFound { name: String, searched: String },

    // === Script Errors ===
    #[error("Failed to synthesize script: {0}")]
    Synthesis(String),

    #[error("Invalid key pattern: {0}")]
    Pattern(#[from] regex::Error),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a tool not found error with the locations that were tried
    pub fn tool_not_found<S: AsRef<str>>(name: &str, searched: &[S]) -> Self {
        Self::ToolNotFound {
            name: name.to_string(),
            searched: searched
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
