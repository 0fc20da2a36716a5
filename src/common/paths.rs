//! Configuration paths and tool resolution

use std::path::{Path, PathBuf};

use super::{Error, Result};

/// Name used for the configuration directory
const APP_NAME: &str = "replay-harness";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/replay-harness/`
/// - macOS: `~/Library/Application Support/replay-harness/`
/// - Windows: `%APPDATA%\replay-harness\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Resolve the replay tool binary
///
/// Anything that looks like a path (contains a separator or names an
/// existing file) is taken literally; bare names are looked up on `PATH`.
pub fn resolve_tool(tool: &Path) -> Result<PathBuf> {
    if tool.is_file() {
        return Ok(anchored(tool));
    }

    let looks_like_path = tool.components().count() > 1;
    if looks_like_path {
        return Err(Error::tool_not_found(
            &tool.display().to_string(),
            &[tool.display().to_string()],
        ));
    }

    which::which(tool).map_err(|_| {
        Error::tool_not_found(&tool.display().to_string(), &["PATH"])
    })
}

/// Prefix a bare file name with `./` so that spawning it does not fall
/// back to a `PATH` search
fn anchored(tool: &Path) -> PathBuf {
    if tool.is_relative() && tool.components().count() == 1 {
        Path::new(".").join(tool)
    } else {
        tool.to_path_buf()
    }
}
